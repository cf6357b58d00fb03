//! # Owner Namespaces
//!
//! Maps application-level (owner, file name) pairs onto flat storage keys.
//! Every owner gets exactly one prefix, `"{owner}/"`, and every file of
//! that owner lives directly under it.

use std::fmt;

use super::errors::{StorageError, StorageResult};

/// Separator between the owner and the file name in a storage key
pub const SEPARATOR: char = '/';

/// Flat address of an object in the backing store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Listing prefix grouping all keys of one owner
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerPrefix(String);

impl OwnerPrefix {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The folder marker lives at the prefix itself.
    pub fn marker_key(&self) -> StorageKey {
        StorageKey(self.0.clone())
    }

    /// Strip this prefix from a listed key, yielding the file name.
    pub fn strip<'a>(&self, key: &'a str) -> Option<&'a str> {
        key.strip_prefix(self.0.as_str())
    }
}

impl fmt::Display for OwnerPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Storage key for a file: `"{owner}/{file_name}"`
pub fn resolve_key(owner: &str, file_name: &str) -> StorageKey {
    StorageKey(format!("{}{}{}", owner, SEPARATOR, file_name))
}

/// Listing prefix for an owner: `"{owner}/"`
pub fn resolve_prefix(owner: &str) -> OwnerPrefix {
    OwnerPrefix(format!("{}{}", owner, SEPARATOR))
}

/// Key of the zero-byte folder marker for an owner
pub fn folder_marker(owner: &str) -> StorageKey {
    resolve_prefix(owner).marker_key()
}

/// Names that no path segment can carry; URL and filesystem layers
/// collapse them into the parent.
const DOT_SEGMENTS: [&str; 2] = [".", ".."];

/// Reject owners that are empty, dot segments, or would shift the separator.
pub fn validate_owner(owner: &str) -> StorageResult<()> {
    validate_part("owner", owner)
}

/// Reject file names that are empty (reserved for the folder marker), dot
/// segments, or contain the separator.
pub fn validate_file_name(file_name: &str) -> StorageResult<()> {
    validate_part("file_name", file_name)
}

fn validate_part(field: &'static str, value: &str) -> StorageResult<()> {
    if value.is_empty() {
        return Err(StorageError::MissingField(field));
    }
    if DOT_SEGMENTS.contains(&value) {
        return Err(StorageError::InvalidName(format!(
            "{} must not be '{}'",
            field, value
        )));
    }
    if value.contains(SEPARATOR) {
        return Err(StorageError::InvalidName(format!(
            "{} must not contain '{}': {}",
            field, SEPARATOR, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_key() {
        assert_eq!(resolve_key("alice", "a.txt").as_str(), "alice/a.txt");
    }

    #[test]
    fn test_resolve_prefix() {
        let prefix = resolve_prefix("alice");
        assert_eq!(prefix.as_str(), "alice/");
        assert_eq!(prefix.strip("alice/a.txt"), Some("a.txt"));
        assert_eq!(prefix.strip("bob/a.txt"), None);
    }

    #[test]
    fn test_folder_marker_is_prefix() {
        assert_eq!(folder_marker("alice").as_str(), "alice/");
        assert_eq!(folder_marker("alice"), resolve_key("alice", ""));
    }

    #[test]
    fn test_key_starts_with_prefix() {
        let key = resolve_key("carol", "notes.md");
        assert!(key.as_str().starts_with(resolve_prefix("carol").as_str()));
    }

    #[test]
    fn test_validation() {
        assert!(validate_owner("alice").is_ok());
        assert!(validate_file_name("report final.pdf").is_ok());

        assert_eq!(validate_owner(""), Err(StorageError::MissingField("owner")));
        assert_eq!(
            validate_file_name(""),
            Err(StorageError::MissingField("file_name"))
        );
        assert!(matches!(
            validate_owner("a/b"),
            Err(StorageError::InvalidName(_))
        ));
        assert!(matches!(
            validate_file_name("dir/file"),
            Err(StorageError::InvalidName(_))
        ));
    }

    #[test]
    fn test_dot_segments_rejected() {
        for name in [".", ".."] {
            assert!(matches!(validate_owner(name), Err(StorageError::InvalidName(_))));
            assert!(matches!(
                validate_file_name(name),
                Err(StorageError::InvalidName(_))
            ));
        }
        assert!(validate_file_name(".hidden").is_ok());
        assert!(validate_file_name("...").is_ok());
        assert!(validate_owner("a..b").is_ok());
    }
}
