//! # In-Memory Backend

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use super::backend::ObjectStore;
use super::errors::{StorageError, StorageResult};

/// In-memory object store with lexical key ordering.
///
/// Can be taken offline to simulate an unreachable backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
    offline: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreUnavailable`
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of stored objects, folder markers included
    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> StorageResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StorageError::StoreUnavailable("backend offline".into()))
        } else {
            Ok(())
        }
    }
}

impl ObjectStore for MemoryBackend {
    fn put_object(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        self.check_online()?;
        let mut objects = self
            .objects
            .write()
            .map_err(|_| StorageError::StoreUnavailable("Lock poisoned".into()))?;
        objects.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn get_object(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.check_online()?;
        let objects = self
            .objects
            .read()
            .map_err(|_| StorageError::StoreUnavailable("Lock poisoned".into()))?;
        objects
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn list_objects(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.check_online()?;
        let objects = self
            .objects
            .read()
            .map_err(|_| StorageError::StoreUnavailable("Lock poisoned".into()))?;
        Ok(objects
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}
