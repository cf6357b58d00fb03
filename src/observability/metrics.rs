//! Metrics registry
//!
//! Monotonic counters, reset only on process start. Relaxed atomics: exact
//! cross-counter consistency is not needed.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for the file service
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    uploads: AtomicU64,
    bytes_uploaded: AtomicU64,
    listings: AtomicU64,
    links_issued: AtomicU64,
    links_not_found: AtomicU64,
    links_rejected: AtomicU64,
    objects_served: AtomicU64,
    store_failures: AtomicU64,
    link_failures: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successful upload of `bytes` bytes
    pub fn record_upload(&self, bytes: u64) {
        self.uploads.fetch_add(1, Ordering::Relaxed);
        self.bytes_uploaded.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn increment_listings(&self) {
        self.listings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_links_issued(&self) {
        self.links_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_links_not_found(&self) {
        self.links_not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_links_rejected(&self) {
        self.links_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_objects_served(&self) {
        self.objects_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_store_failures(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_link_failures(&self) {
        self.link_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uploads: self.uploads.load(Ordering::Relaxed),
            bytes_uploaded: self.bytes_uploaded.load(Ordering::Relaxed),
            listings: self.listings.load(Ordering::Relaxed),
            links_issued: self.links_issued.load(Ordering::Relaxed),
            links_not_found: self.links_not_found.load(Ordering::Relaxed),
            links_rejected: self.links_rejected.load(Ordering::Relaxed),
            objects_served: self.objects_served.load(Ordering::Relaxed),
            store_failures: self.store_failures.load(Ordering::Relaxed),
            link_failures: self.link_failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub uploads: u64,
    pub bytes_uploaded: u64,
    pub listings: u64,
    pub links_issued: u64,
    pub links_not_found: u64,
    pub links_rejected: u64,
    pub objects_served: u64,
    pub store_failures: u64,
    pub link_failures: u64,
}
