//! # Signed URL Generation
//!
//! Stateless presigning: a link carries its key, expiry and an HMAC-SHA256
//! over both. Nothing about issued links is stored server-side.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use url::Url;

use super::errors::{StorageError, StorageResult};
use super::namespace::StorageKey;

type HmacSha256 = Hmac<Sha256>;

/// Default link lifetime in seconds
pub const DEFAULT_LINK_TTL_SECS: u64 = 3600;

/// Signed URL generator
pub struct SignedUrlGenerator {
    secret: Vec<u8>,
    endpoint: String,
    issued: AtomicU64,
}

impl std::fmt::Debug for SignedUrlGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedUrlGenerator")
            .field("endpoint", &self.endpoint)
            .field("issued", &self.issued.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl SignedUrlGenerator {
    /// Create a new generator. `endpoint` is the absolute URL under which
    /// objects are served, e.g. `http://host/act5/api/v1/object`.
    pub fn new(secret: &[u8], endpoint: impl Into<String>) -> Self {
        Self {
            secret: secret.to_vec(),
            endpoint: endpoint.into(),
            issued: AtomicU64::new(0),
        }
    }

    /// Number of links signed so far
    pub fn issued_count(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }

    /// Produce a read-only URL for key, valid for `ttl_secs` from now
    pub fn presign_get(&self, key: &StorageKey, ttl_secs: u64) -> StorageResult<SignedUrl> {
        if ttl_secs == 0 {
            return Err(StorageError::LinkGenerationError(
                "link ttl must be positive".into(),
            ));
        }
        let ttl = i64::try_from(ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| StorageError::LinkGenerationError("link ttl out of range".into()))?;
        let expires_at = Utc::now() + ttl;
        self.presign_until(key, expires_at)
    }

    fn presign_until(&self, key: &StorageKey, expires_at: DateTime<Utc>) -> StorageResult<SignedUrl> {
        let signature = self.sign(key.as_str(), expires_at.timestamp())?;

        let mut url = Url::parse(&self.endpoint).map_err(|e| {
            StorageError::LinkGenerationError(format!("bad endpoint {}: {}", self.endpoint, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                StorageError::LinkGenerationError(format!(
                    "endpoint cannot carry a path: {}",
                    self.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(key.as_str().split('/'));
        url.query_pairs_mut()
            .append_pair("expires", &expires_at.timestamp().to_string())
            .append_pair("signature", &signature);

        self.issued.fetch_add(1, Ordering::Relaxed);

        Ok(SignedUrl {
            key: key.clone(),
            url: url.to_string(),
            expires_at,
            signature,
        })
    }

    /// Verify a presented link for key
    pub fn verify(&self, key: &StorageKey, expires: i64, signature: &str) -> StorageResult<()> {
        // Check expiry
        if Utc::now().timestamp() > expires {
            return Err(StorageError::LinkExpired);
        }

        // Verify signature
        let provided = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| StorageError::InvalidSignature)?;
        let expected = self
            .mac(key.as_str(), expires)
            .map_err(|_| StorageError::InvalidSignature)?;

        if bool::from(expected.as_slice().ct_eq(provided.as_slice())) {
            Ok(())
        } else {
            Err(StorageError::InvalidSignature)
        }
    }

    fn sign(&self, key: &str, expires: i64) -> StorageResult<String> {
        Ok(URL_SAFE_NO_PAD.encode(self.mac(key, expires)?))
    }

    fn mac(&self, key: &str, expires: i64) -> StorageResult<Vec<u8>> {
        if self.secret.is_empty() {
            return Err(StorageError::LinkGenerationError(
                "signing secret not configured".into(),
            ));
        }
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| StorageError::LinkGenerationError(e.to_string()))?;
        mac.update(b"GET\n");
        mac.update(key.as_bytes());
        mac.update(b"\n");
        mac.update(expires.to_string().as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// A signed URL
#[derive(Debug, Clone)]
pub struct SignedUrl {
    pub key: StorageKey,
    pub url: String,
    pub expires_at: DateTime<Utc>,
    pub signature: String,
}
