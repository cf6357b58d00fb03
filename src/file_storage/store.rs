//! # Owner-Scoped Object Store
//!
//! Wraps an [`ObjectStore`] with create, list and existence checks scoped
//! to an owner prefix. Calls are single attempts; backend failures are
//! logged and returned, never retried.

use serde::{Deserialize, Serialize};

use super::backend::ObjectStore;
use super::errors::{StorageError, StorageResult};
use super::namespace::{self, OwnerPrefix, StorageKey};
use crate::observability::{log_event_with_fields, Event};

/// How listings exclude the owner's folder marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListingMode {
    /// Drop only entries equal to the folder-marker key
    #[default]
    FilterMarker,
    /// Drop the first listed entry whatever it is. Matches deployments
    /// that relied on the marker always being listed first; loses a real
    /// file when the marker is absent or not first.
    LegacyDropFirst,
}

/// Owner-scoped adapter over an object store
#[derive(Debug)]
pub struct ObjectStoreAdapter<B: ObjectStore> {
    backend: B,
    listing_mode: ListingMode,
}

impl<B: ObjectStore> ObjectStoreAdapter<B> {
    pub fn new(backend: B, listing_mode: ListingMode) -> Self {
        Self {
            backend,
            listing_mode,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn listing_mode(&self) -> ListingMode {
        self.listing_mode
    }

    /// Persist content at key, replacing any existing object
    pub fn put(&self, key: &StorageKey, content: &[u8]) -> StorageResult<()> {
        self.backend
            .put_object(key.as_str(), content)
            .map_err(|e| self.failed("put", key.as_str(), e))
    }

    /// Create the owner's zero-byte folder marker. Idempotent.
    pub fn ensure_folder(&self, owner: &str) -> StorageResult<()> {
        let marker = namespace::folder_marker(owner);
        self.put(&marker, &[])?;
        log_event_with_fields(Event::FolderEnsured, &[("key", marker.as_str())]);
        Ok(())
    }

    /// File names under prefix, in backend listing order
    pub fn list(&self, prefix: &OwnerPrefix) -> StorageResult<Vec<String>> {
        let keys = self
            .backend
            .list_objects(prefix.as_str())
            .map_err(|e| self.failed("list", prefix.as_str(), e))?;

        let names = match self.listing_mode {
            ListingMode::FilterMarker => {
                let marker = prefix.marker_key();
                keys.iter()
                    .filter(|key| key.as_str() != marker.as_str())
                    .filter_map(|key| prefix.strip(key))
                    .map(str::to_string)
                    .collect()
            }
            ListingMode::LegacyDropFirst => keys
                .iter()
                .skip(1)
                .filter_map(|key| prefix.strip(key))
                .map(str::to_string)
                .collect(),
        };
        Ok(names)
    }

    /// Whether file_name appears in the owner's listing
    pub fn exists(&self, owner: &str, file_name: &str) -> StorageResult<bool> {
        let files = self.list(&namespace::resolve_prefix(owner))?;
        Ok(files.iter().any(|f| f == file_name))
    }

    /// Raw bytes at key
    pub fn get(&self, key: &StorageKey) -> StorageResult<Vec<u8>> {
        self.backend.get_object(key.as_str()).map_err(|e| match e {
            StorageError::NotFound(_) => e,
            other => self.failed("get", key.as_str(), other),
        })
    }

    fn failed(&self, op: &str, key: &str, e: StorageError) -> StorageError {
        let e = match e {
            StorageError::StoreUnavailable(_) | StorageError::InvalidName(_) => e,
            other => StorageError::StoreUnavailable(other.to_string()),
        };
        let reason = e.to_string();
        log_event_with_fields(
            Event::StoreFailed,
            &[("key", key), ("op", op), ("reason", reason.as_str())],
        );
        e
    }
}
