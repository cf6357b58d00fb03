//! # Object Store Trait

use super::errors::StorageResult;

/// Durable key-value blob store backing the file service.
///
/// Keys are flat strings. A key ending in `/` is a zero-byte folder marker.
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// Write data at key, replacing any existing object
    fn put_object(&self, key: &str, data: &[u8]) -> StorageResult<()>;

    /// Read the object at key
    fn get_object(&self, key: &str) -> StorageResult<Vec<u8>>;

    /// List every key starting with prefix. Ordering is backend-defined.
    fn list_objects(&self, prefix: &str) -> StorageResult<Vec<String>>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for std::sync::Arc<T> {
    fn put_object(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        (**self).put_object(key, data)
    }

    fn get_object(&self, key: &str) -> StorageResult<Vec<u8>> {
        (**self).get_object(key)
    }

    fn list_objects(&self, prefix: &str) -> StorageResult<Vec<String>> {
        (**self).list_objects(prefix)
    }
}
