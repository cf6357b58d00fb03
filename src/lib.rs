//! filedrop - owner-scoped file storage with temporary download links
//!
//! - [`file_storage`]: namespaces, object stores, signed links, file service
//! - [`http_server`]: Axum JSON API over the file service
//! - [`cli`]: `serve` and the interactive `shell`

pub mod cli;
pub mod config;
pub mod file_storage;
pub mod http_server;
pub mod observability;
