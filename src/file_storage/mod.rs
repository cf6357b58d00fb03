//! # File Storage Module
//!
//! Owner-scoped file storage with temporary signed download links.
//!
//! Files live at `"{owner}/{file_name}"` in a flat object store; each owner
//! also gets a zero-byte folder marker at `"{owner}/"`.

pub mod errors;
pub mod namespace;
pub mod backend;
pub mod local;
pub mod memory;
pub mod store;
pub mod signed_url;
pub mod link;
pub mod file;

pub use errors::{StorageError, StorageResult};
pub use namespace::{resolve_key, resolve_prefix, OwnerPrefix, StorageKey};
pub use backend::ObjectStore;
pub use local::LocalBackend;
pub use memory::MemoryBackend;
pub use store::{ListingMode, ObjectStoreAdapter};
pub use signed_url::{SignedUrl, SignedUrlGenerator, DEFAULT_LINK_TTL_SECS};
pub use link::LinkIssuer;
pub use file::FileService;
