//! Service configuration
//!
//! Loaded from a JSON file; every field has a default, so a missing file
//! yields a runnable configuration. A few fields can be overridden from
//! the environment.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::{CliError, CliResult};
use crate::file_storage::{ListingMode, DEFAULT_LINK_TTL_SECS};
use crate::http_server::{HttpServerConfig, API_BASE_PATH};

/// Environment variable overriding `bucket`
pub const BUCKET_ENV: &str = "FILEDROP_BUCKET";
/// Environment variable overriding `signing_secret`
pub const SECRET_ENV: &str = "FILEDROP_SIGNING_SECRET";

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Directory holding buckets (default "./filedrop_data")
    #[serde(default = "default_storage_root")]
    pub storage_root: String,

    /// Bucket name; objects live under `storage_root/bucket`
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// HMAC key for download links. Generated per process when absent.
    #[serde(default)]
    pub signing_secret: Option<String>,

    /// Download link lifetime (default 3600)
    #[serde(default = "default_link_ttl")]
    pub link_ttl_secs: u64,

    /// Externally reachable base URL used in download links
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Folder-marker handling in listings
    #[serde(default)]
    pub listing_mode: ListingMode,

    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_storage_root() -> String {
    "./filedrop_data".to_string()
}
fn default_bucket() -> String {
    "filedrop".to_string()
}
fn default_link_ttl() -> u64 {
    DEFAULT_LINK_TTL_SECS
}
fn default_public_base_url() -> String {
    "http://127.0.0.1:54321".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_root: default_storage_root(),
            bucket: default_bucket(),
            signing_secret: None,
            link_ttl_secs: default_link_ttl(),
            public_base_url: default_public_base_url(),
            listing_mode: ListingMode::default(),
            http: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, apply environment overrides, validate.
    /// A missing file means defaults.
    pub fn load(path: &Path) -> CliResult<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;
            Self::from_json(&content)?
        } else {
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration JSON without validating
    pub fn from_json(content: &str) -> CliResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))
    }

    /// Override fields from environment lookups
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bucket) = lookup(BUCKET_ENV).filter(|v| !v.is_empty()) {
            self.bucket = bucket;
        }
        if let Some(secret) = lookup(SECRET_ENV).filter(|v| !v.is_empty()) {
            self.signing_secret = Some(secret);
        }
    }

    pub fn validate(&self) -> CliResult<()> {
        if self.bucket.is_empty() {
            return Err(CliError::config_error("bucket must not be empty"));
        }
        if self.bucket.contains('/') || self.bucket == "." || self.bucket == ".." {
            return Err(CliError::config_error(format!(
                "Invalid bucket name: '{}'",
                self.bucket
            )));
        }
        if self.link_ttl_secs == 0 {
            return Err(CliError::config_error("link_ttl_secs must be > 0"));
        }
        url::Url::parse(&self.public_base_url).map_err(|e| {
            CliError::config_error(format!(
                "Invalid public_base_url '{}': {}",
                self.public_base_url, e
            ))
        })?;
        Ok(())
    }

    /// Directory backing the bucket
    pub fn bucket_path(&self) -> PathBuf {
        Path::new(&self.storage_root).join(&self.bucket)
    }

    /// Absolute URL under which signed objects are served
    pub fn object_endpoint(&self) -> String {
        format!(
            "{}{}/object",
            self.public_base_url.trim_end_matches('/'),
            API_BASE_PATH
        )
    }

    /// Configured signing secret, or fresh random bytes. The flag is true
    /// when the secret was generated.
    pub fn signing_secret_bytes(&self) -> (Vec<u8>, bool) {
        match self.signing_secret.as_deref() {
            Some(secret) if !secret.is_empty() => (secret.as_bytes().to_vec(), false),
            _ => (rand::random::<[u8; 32]>().to_vec(), true),
        }
    }
}
