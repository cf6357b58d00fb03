//! # HTTP Server
//!
//! Combines the file API and observability routers into one Axum app.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::observability_routes::observability_routes;
use super::storage_routes::{invalid_path_handler, storage_routes, StorageState};
use super::API_BASE_PATH;
use crate::file_storage::{LocalBackend, ObjectStore};
use crate::observability::{log_event_with_fields, Event};

/// Build the combined router
pub fn build_router<B: ObjectStore + 'static>(
    state: Arc<StorageState<B>>,
    config: &HttpServerConfig,
) -> Router {
    let cors = if config.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let metrics = state.metrics();

    Router::new()
        .merge(observability_routes(metrics))
        .nest(API_BASE_PATH, storage_routes(state))
        .fallback(invalid_path_handler)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(cors)
}

/// HTTP server for the file service
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new<B: ObjectStore + 'static>(
        state: Arc<StorageState<B>>,
        config: HttpServerConfig,
    ) -> Self {
        let router = build_router(state, &config);
        Self { config, router }
    }

    /// Filesystem-backed server from a full service configuration
    pub fn from_config(config: &crate::config::Config) -> Self {
        let state: Arc<StorageState<LocalBackend>> = Arc::new(StorageState::from_config(config));
        Self::new(state, config.http.clone())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?.to_string();
        let base = format!("http://{}{}", bound, API_BASE_PATH);
        log_event_with_fields(Event::Serving, &[("addr", bound.as_str()), ("api", base.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn test_config(temp: &TempDir, port: u16) -> Config {
        Config {
            storage_root: temp.path().to_string_lossy().into_owned(),
            signing_secret: Some("secret".to_string()),
            http: HttpServerConfig::with_port(port),
            ..Config::default()
        }
    }

    #[test]
    fn test_server_creation() {
        let temp = TempDir::new().unwrap();
        let server = HttpServer::from_config(&test_config(&temp, 54321));
        assert_eq!(server.socket_addr(), "0.0.0.0:54321");
    }

    #[test]
    fn test_server_with_custom_port() {
        let temp = TempDir::new().unwrap();
        let server = HttpServer::from_config(&test_config(&temp, 8080));
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds() {
        let temp = TempDir::new().unwrap();
        let _router = HttpServer::from_config(&test_config(&temp, 0)).router();
    }
}
