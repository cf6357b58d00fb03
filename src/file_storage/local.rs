//! # Local Filesystem Backend
//!
//! Keys map onto paths below a root directory. A folder-marker key
//! (`"owner/"`) is the directory itself. Writes go to a staging file first
//! and are renamed into place, so readers see either the old or the new
//! object.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use uuid::Uuid;

use super::backend::ObjectStore;
use super::errors::{StorageError, StorageResult};

const STAGING_DIR: &str = ".staging";

/// Local filesystem storage backend
#[derive(Debug)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a new local backend
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, key: &str) -> StorageResult<PathBuf> {
        let relative = Path::new(key.trim_end_matches('/'));
        for component in relative.components() {
            match component {
                Component::Normal(part) if part != STAGING_DIR => {}
                _ => {
                    return Err(StorageError::InvalidName(format!(
                        "key not addressable on local disk: {}",
                        key
                    )))
                }
            }
        }
        Ok(self.root.join(relative))
    }

    fn walk(&self, dir: &Path, rel: &str, out: &mut Vec<String>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = match entry.file_name().to_str() {
                Some(name) => name.to_string(),
                None => continue,
            };
            if rel.is_empty() && name == STAGING_DIR {
                continue;
            }
            let key = format!("{}{}", rel, name);
            if entry.file_type()?.is_dir() {
                let dir_key = format!("{}/", key);
                out.push(dir_key.clone());
                self.walk(&entry.path(), &dir_key, out)?;
            } else {
                out.push(key);
            }
        }
        Ok(())
    }
}

impl ObjectStore for LocalBackend {
    fn put_object(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        let full_path = self.full_path(key)?;

        if key.ends_with('/') {
            return fs::create_dir_all(&full_path).map_err(StorageError::unavailable);
        }

        // Create parent directories
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(StorageError::unavailable)?;
        }

        let staging = self.root.join(STAGING_DIR);
        fs::create_dir_all(&staging).map_err(StorageError::unavailable)?;
        let temp_path = staging.join(Uuid::new_v4().to_string());

        fs::write(&temp_path, data).map_err(StorageError::unavailable)?;
        fs::rename(&temp_path, &full_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            StorageError::unavailable(e)
        })
    }

    fn get_object(&self, key: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(key)?;

        if key.ends_with('/') {
            return if full_path.is_dir() {
                Ok(Vec::new())
            } else {
                Err(StorageError::NotFound(key.to_string()))
            };
        }
        if full_path.is_dir() {
            return Err(StorageError::NotFound(key.to_string()));
        }

        fs::read(&full_path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound(key.to_string())
            } else {
                StorageError::unavailable(e)
            }
        })
    }

    fn list_objects(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let dir_part = match prefix.rfind('/') {
            Some(idx) => &prefix[..=idx],
            None => "",
        };
        let start = if dir_part.is_empty() {
            self.root.clone()
        } else {
            self.full_path(dir_part)?
        };

        let mut results = Vec::new();
        if !start.is_dir() {
            return Ok(results);
        }
        if !dir_part.is_empty() {
            results.push(dir_part.to_string());
        }
        self.walk(&start, dir_part, &mut results)
            .map_err(StorageError::unavailable)?;

        results.retain(|key| key.starts_with(prefix));
        results.sort();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_read() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().to_path_buf());

        backend.put_object("alice/test.txt", b"hello").unwrap();
        let data = backend.get_object("alice/test.txt").unwrap();
        assert_eq!(data, b"hello");
    }

    #[test]
    fn test_overwrite() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().to_path_buf());

        backend.put_object("alice/a.txt", b"first").unwrap();
        backend.put_object("alice/a.txt", b"second").unwrap();
        assert_eq!(backend.get_object("alice/a.txt").unwrap(), b"second");
    }

    #[test]
    fn test_folder_marker_lists_first() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().to_path_buf());

        backend.put_object("alice/", b"").unwrap();
        backend.put_object("alice/b.txt", b"b").unwrap();
        backend.put_object("alice/a.txt", b"a").unwrap();
        backend.put_object("alicia/c.txt", b"c").unwrap();

        let keys = backend.list_objects("alice/").unwrap();
        assert_eq!(keys, vec!["alice/", "alice/a.txt", "alice/b.txt"]);
        assert_eq!(backend.get_object("alice/").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_list_skips_staging() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().to_path_buf());

        backend.put_object("bob/x", b"x").unwrap();
        let keys = backend.list_objects("").unwrap();
        assert_eq!(keys, vec!["bob/", "bob/x"]);
    }

    #[test]
    fn test_list_missing_prefix() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().to_path_buf());

        assert!(backend.list_objects("nobody/").unwrap().is_empty());
    }

    #[test]
    fn test_not_found() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().to_path_buf());

        let result = backend.get_object("alice/nonexistent.txt");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_rejects_traversal() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::new(temp.path().join("bucket"));

        let result = backend.put_object("../escape.txt", b"nope");
        assert!(matches!(result, Err(StorageError::InvalidName(_))));
        assert!(!temp.path().join("escape.txt").exists());
    }
}
