//! # Download Link Issuance

use super::backend::ObjectStore;
use super::errors::{StorageError, StorageResult};
use super::namespace;
use super::signed_url::{SignedUrl, SignedUrlGenerator, DEFAULT_LINK_TTL_SECS};
use super::store::ObjectStoreAdapter;
use crate::observability::{log_event_with_fields, Event};

/// Issues temporary read links for files that exist in an owner's listing
#[derive(Debug)]
pub struct LinkIssuer {
    signer: SignedUrlGenerator,
    default_ttl_secs: u64,
}

impl LinkIssuer {
    pub fn new(signer: SignedUrlGenerator) -> Self {
        Self {
            signer,
            default_ttl_secs: DEFAULT_LINK_TTL_SECS,
        }
    }

    pub fn with_ttl(mut self, ttl_secs: u64) -> Self {
        self.default_ttl_secs = ttl_secs;
        self
    }

    pub fn signer(&self) -> &SignedUrlGenerator {
        &self.signer
    }

    pub fn default_ttl_secs(&self) -> u64 {
        self.default_ttl_secs
    }

    /// Existence check first; only files present in the owner's listing
    /// are signed.
    pub fn issue_download_link<B: ObjectStore>(
        &self,
        store: &ObjectStoreAdapter<B>,
        owner: &str,
        file_name: &str,
        ttl_secs: Option<u64>,
    ) -> StorageResult<SignedUrl> {
        let key = namespace::resolve_key(owner, file_name);

        if !store.exists(owner, file_name)? {
            return Err(StorageError::NotFound(key.into_string()));
        }

        let ttl = ttl_secs.unwrap_or(self.default_ttl_secs);
        self.signer.presign_get(&key, ttl).map_err(|e| {
            let reason = e.to_string();
            log_event_with_fields(
                Event::LinkFailed,
                &[("key", key.as_str()), ("reason", reason.as_str())],
            );
            match e {
                StorageError::LinkGenerationError(_) => e,
                other => StorageError::LinkGenerationError(other.to_string()),
            }
        })
    }
}
