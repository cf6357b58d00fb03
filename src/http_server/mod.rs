//! # HTTP Server Module
//!
//! Axum server exposing the file service.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/metrics` - Counters as JSON
//! - `/act5/api/v1/put` - Upload a base64-encoded file
//! - `/act5/api/v1/get` - Issue a download link
//! - `/act5/api/v1/view` - List an owner's files
//! - `/act5/api/v1/object/:owner/:file_name` - Serve a signed link

pub mod config;
pub mod server;
pub mod storage_routes;
pub mod observability_routes;

pub use config::HttpServerConfig;
pub use server::{build_router, HttpServer};
pub use storage_routes::StorageState;

/// Path prefix of the file API
pub const API_BASE_PATH: &str = "/act5/api/v1";
