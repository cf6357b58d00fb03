//! Storage HTTP Routes
//!
//! JSON endpoints for upload, listing and link issuance, plus the object
//! endpoint that signed links point at.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::file_storage::{
    FileService, LinkIssuer, LocalBackend, ObjectStore, ObjectStoreAdapter, SignedUrlGenerator,
    StorageError,
};
use crate::observability::{log_event, log_event_with_fields, Event, MetricsRegistry};

// ==================
// Shared State
// ==================

/// Storage state shared across handlers
#[derive(Debug)]
pub struct StorageState<B: ObjectStore> {
    pub file_service: FileService<B>,
}

impl<B: ObjectStore> StorageState<B> {
    pub fn new(file_service: FileService<B>) -> Self {
        Self { file_service }
    }

    pub fn metrics(&self) -> Arc<MetricsRegistry> {
        Arc::clone(self.file_service.metrics())
    }
}

impl StorageState<LocalBackend> {
    /// Build the filesystem-backed service described by config
    pub fn from_config(config: &Config) -> Self {
        let backend = LocalBackend::new(config.bucket_path());
        let store = ObjectStoreAdapter::new(backend, config.listing_mode);

        let (secret, generated) = config.signing_secret_bytes();
        if generated {
            log_event(Event::EphemeralSecret);
        }
        let signer = SignedUrlGenerator::new(&secret, config.object_endpoint());
        let links = LinkIssuer::new(signer).with_ttl(config.link_ttl_secs);

        Self::new(FileService::new(store, links))
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Default, Deserialize)]
pub struct PutRequest {
    pub owner: Option<String>,
    pub file_name: Option<String>,
    /// Base64-encoded file content
    pub file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GetRequest {
    pub owner: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewRequest {
    pub owner: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PutResponse {
    pub post: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetResponse {
    pub file_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ViewResponse {
    pub files: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

/// Handler failure rendered as `{"error": ..., "code": ...}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        let status =
            StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match &e {
            StorageError::MissingField(_) => "Missing required fields".to_string(),
            StorageError::InvalidName(_) => e.to_string(),
            StorageError::NotFound(_) => "File not found".to_string(),
            StorageError::StoreUnavailable(_) => "Storage unavailable".to_string(),
            StorageError::LinkGenerationError(_) => "Internal server error".to_string(),
            StorageError::LinkExpired => "Link expired".to_string(),
            StorageError::InvalidSignature => "Invalid signature".to_string(),
        };
        Self::new(status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            code: self.status.as_u16(),
        };
        (self.status, Json(body)).into_response()
    }
}

// ==================
// Storage Routes
// ==================

/// Create storage routes. A known path called with an unrouted method is
/// answered like an unknown path.
pub fn storage_routes<B: ObjectStore + 'static>(state: Arc<StorageState<B>>) -> Router {
    Router::new()
        .route(
            "/put",
            put(put_handler::<B>)
                .post(put_handler::<B>)
                .fallback(invalid_path_handler),
        )
        .route(
            "/get",
            get(get_handler::<B>)
                .post(get_handler::<B>)
                .fallback(invalid_path_handler),
        )
        .route(
            "/view",
            get(view_handler::<B>)
                .post(view_handler::<B>)
                .fallback(invalid_path_handler),
        )
        .route(
            "/object/:owner/:file_name",
            get(object_handler::<B>).fallback(invalid_path_handler),
        )
        .with_state(state)
}

/// Unknown paths and methods
pub async fn invalid_path_handler() -> ApiError {
    ApiError::bad_request("Invalid path")
}

// ==================
// Helper Functions
// ==================

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::bad_request("Invalid request body"))
}

/// A field counts as present only when non-empty
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

/// `expires` and `signature` from a link's query. Anything absent or
/// unparsable reads as a bad signature.
fn signed_params(query: &HashMap<String, String>) -> Result<(i64, &str), StorageError> {
    let expires = query
        .get("expires")
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or(StorageError::InvalidSignature)?;
    let signature = query
        .get("signature")
        .map(String::as_str)
        .ok_or(StorageError::InvalidSignature)?;
    Ok((expires, signature))
}

fn rejected(request_id: &Uuid, route: &str, err: ApiError) -> ApiError {
    let id = request_id.to_string();
    let status = err.status.as_u16().to_string();
    log_event_with_fields(
        Event::RequestRejected,
        &[
            ("reason", err.message.as_str()),
            ("request_id", id.as_str()),
            ("route", route),
            ("status", status.as_str()),
        ],
    );
    err
}

// ==================
// Handlers
// ==================

async fn put_handler<B: ObjectStore + 'static>(
    State(state): State<Arc<StorageState<B>>>,
    body: Bytes,
) -> Result<Json<PutResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    put_inner(&state, &body).map_err(|e| rejected(&request_id, "put", e))
}

fn put_inner<B: ObjectStore>(
    state: &StorageState<B>,
    body: &Bytes,
) -> Result<Json<PutResponse>, ApiError> {
    let request: PutRequest = parse_body(body)?;

    let (owner, file_name, file) = match (
        present(&request.owner),
        present(&request.file_name),
        present(&request.file),
    ) {
        (Some(owner), Some(file_name), Some(file)) => (owner, file_name, file),
        _ => return Err(ApiError::bad_request("Missing required fields")),
    };

    let content = STANDARD
        .decode(file)
        .map_err(|_| ApiError::bad_request("File content is not valid base64"))?;

    state.file_service.upload(owner, file_name, &content)?;

    Ok(Json(PutResponse {
        post: "OK".to_string(),
    }))
}

async fn get_handler<B: ObjectStore + 'static>(
    State(state): State<Arc<StorageState<B>>>,
    body: Bytes,
) -> Result<Json<GetResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    get_inner(&state, &body).map_err(|e| rejected(&request_id, "get", e))
}

fn get_inner<B: ObjectStore>(
    state: &StorageState<B>,
    body: &Bytes,
) -> Result<Json<GetResponse>, ApiError> {
    let request: GetRequest = parse_body(body)?;

    let (owner, file_name) = match (present(&request.owner), present(&request.file_name)) {
        (Some(owner), Some(file_name)) => (owner, file_name),
        _ => return Err(ApiError::bad_request("Missing required fields")),
    };

    let link = state.file_service.download_link(owner, file_name)?;

    Ok(Json(GetResponse { file_url: link.url }))
}

async fn view_handler<B: ObjectStore + 'static>(
    State(state): State<Arc<StorageState<B>>>,
    body: Bytes,
) -> Result<Json<ViewResponse>, ApiError> {
    let request_id = Uuid::new_v4();
    view_inner(&state, &body).map_err(|e| rejected(&request_id, "view", e))
}

fn view_inner<B: ObjectStore>(
    state: &StorageState<B>,
    body: &Bytes,
) -> Result<Json<ViewResponse>, ApiError> {
    let request: ViewRequest = parse_body(body)?;

    let owner = present(&request.owner).ok_or_else(|| ApiError::bad_request("Missing owner field"))?;
    let files = state.file_service.view(owner)?;

    Ok(Json(ViewResponse { files }))
}

async fn object_handler<B: ObjectStore + 'static>(
    State(state): State<Arc<StorageState<B>>>,
    Path((owner, file_name)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();

    let (expires, signature) =
        signed_params(&query).map_err(|e| rejected(&request_id, "object", e.into()))?;

    let data = state
        .file_service
        .fetch(&owner, &file_name, expires, signature)
        .map_err(|e| rejected(&request_id, "object", e.into()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        data,
    )
        .into_response())
}
