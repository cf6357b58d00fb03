//! # File Operations
//!
//! The three operations handlers call (`upload`, `view`, `download_link`)
//! plus `fetch`, which serves the bytes behind a signed link.

use std::sync::Arc;

use super::backend::ObjectStore;
use super::errors::{StorageError, StorageResult};
use super::link::LinkIssuer;
use super::namespace;
use super::signed_url::SignedUrl;
use super::store::ObjectStoreAdapter;
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};

/// File service over an owner-scoped object store
#[derive(Debug)]
pub struct FileService<B: ObjectStore> {
    store: ObjectStoreAdapter<B>,
    links: LinkIssuer,
    metrics: Arc<MetricsRegistry>,
}

impl<B: ObjectStore> FileService<B> {
    /// Create a new file service
    pub fn new(store: ObjectStoreAdapter<B>, links: LinkIssuer) -> Self {
        Self {
            store,
            links,
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn store(&self) -> &ObjectStoreAdapter<B> {
        &self.store
    }

    pub fn links(&self) -> &LinkIssuer {
        &self.links
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Upload a file, creating the owner's folder marker if needed.
    /// An existing file with the same name is replaced.
    pub fn upload(&self, owner: &str, file_name: &str, content: &[u8]) -> StorageResult<()> {
        namespace::validate_owner(owner)?;
        namespace::validate_file_name(file_name)?;

        let key = namespace::resolve_key(owner, file_name);
        let result = self
            .store
            .ensure_folder(owner)
            .and_then(|_| self.store.put(&key, content));

        match &result {
            Ok(()) => {
                self.metrics.record_upload(content.len() as u64);
                let size = content.len().to_string();
                log_event_with_fields(
                    Event::UploadComplete,
                    &[("key", key.as_str()), ("size", size.as_str())],
                );
            }
            Err(_) => self.metrics.increment_store_failures(),
        }
        result
    }

    /// List an owner's file names
    pub fn view(&self, owner: &str) -> StorageResult<Vec<String>> {
        namespace::validate_owner(owner)?;

        let prefix = namespace::resolve_prefix(owner);
        let files = self.store.list(&prefix).map_err(|e| {
            self.metrics.increment_store_failures();
            e
        })?;

        self.metrics.increment_listings();
        let count = files.len().to_string();
        log_event_with_fields(
            Event::ListComplete,
            &[("count", count.as_str()), ("prefix", prefix.as_str())],
        );
        Ok(files)
    }

    /// Issue a temporary download link for an existing file
    pub fn download_link(&self, owner: &str, file_name: &str) -> StorageResult<SignedUrl> {
        namespace::validate_owner(owner)?;
        namespace::validate_file_name(file_name)?;

        match self
            .links
            .issue_download_link(&self.store, owner, file_name, None)
        {
            Ok(link) => {
                self.metrics.increment_links_issued();
                let expires = link.expires_at.to_rfc3339();
                log_event_with_fields(
                    Event::LinkIssued,
                    &[("expires_at", expires.as_str()), ("key", link.key.as_str())],
                );
                Ok(link)
            }
            Err(e) => {
                match &e {
                    StorageError::NotFound(key) => {
                        self.metrics.increment_links_not_found();
                        log_event_with_fields(Event::LinkNotFound, &[("key", key.as_str())]);
                    }
                    StorageError::LinkGenerationError(_) => {
                        self.metrics.increment_link_failures()
                    }
                    _ => self.metrics.increment_store_failures(),
                }
                Err(e)
            }
        }
    }

    /// Serve the bytes behind a signed link
    pub fn fetch(
        &self,
        owner: &str,
        file_name: &str,
        expires: i64,
        signature: &str,
    ) -> StorageResult<Vec<u8>> {
        namespace::validate_owner(owner)?;
        namespace::validate_file_name(file_name)?;

        let key = namespace::resolve_key(owner, file_name);
        if let Err(e) = self.links.signer().verify(&key, expires, signature) {
            self.metrics.increment_links_rejected();
            log_event_with_fields(
                Event::LinkRejected,
                &[("key", key.as_str()), ("reason", e.kind())],
            );
            return Err(e);
        }

        let data = self.store.get(&key)?;
        self.metrics.increment_objects_served();
        let size = data.len().to_string();
        log_event_with_fields(
            Event::ObjectServed,
            &[("key", key.as_str()), ("size", size.as_str())],
        );
        Ok(data)
    }
}
