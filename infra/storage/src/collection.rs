use crate::engine::{DocumentLock, Storage};
use crate::error::StorageError;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// File extension of stored documents.
const DOCUMENT_EXT: &str = "doc";
const LOCK_EXT: &str = "lock";

/// Longest accepted document key in bytes. Keys are hex-encoded on disk, which doubles
/// their length, and the result has to fit a 255-byte file name.
pub const MAX_KEY_LEN: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionName(String);

impl TryFrom<String> for CollectionName {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<&str> for CollectionName {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        let name = value.to_lowercase();

        if name.is_empty() {
            return Err(StorageError::invalid_name(value, "Collection name cannot be empty"));
        }
        if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(StorageError::invalid_name(
                value,
                "Collection name contains illegal characters",
            ));
        }

        Ok(Self(name))
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named set of documents addressed by string keys.
///
/// Every key maps to one file named after the hex encoding of the key, so keys are
/// case-sensitive on every filesystem and cannot introduce path separators. Writes replace a
/// document atomically. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Collection {
    storage: Storage,
    name: Arc<CollectionName>,
    dir: Arc<PathBuf>,
}

impl Collection {
    pub(crate) fn new(storage: Storage, name: CollectionName) -> Self {
        let dir = storage.root().join(name.as_ref());
        Self { storage, name: Arc::new(name), dir: Arc::new(dir) }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name.0
    }

    /// Physical path of the document stored under `key`.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidName`] if the key is empty or longer than
    /// [`MAX_KEY_LEN`] bytes.
    pub fn resolve(&self, key: &str) -> Result<PathBuf, StorageError> {
        self.file_for(key, DOCUMENT_EXT)
    }

    fn file_for(&self, key: &str, ext: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::invalid_name(key, "Document key cannot be empty"));
        }
        if key.len() > MAX_KEY_LEN {
            return Err(StorageError::invalid_name(key, "Document key is too long"));
        }
        Ok(self.dir.join(format!("{}.{ext}", hex::encode(key))))
    }

    /// Reads a document, transparently decompressing it.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidName`] for a bad key, [`StorageError::Io`] on disk
    /// failures and [`StorageError::Decompress`] on a corrupt compressed document.
    pub async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.resolve(key)?;
        self.storage.read_file(&path).await
    }

    /// Writes a document atomically, replacing any previous version.
    ///
    /// Writing does not lock. Hold [`Collection::lock`] across a read-modify-write.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidName`] for a bad key and [`StorageError::Io`] if the
    /// disk is full or the swap fails.
    pub async fn write(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.resolve(key)?;
        self.storage.write_file(&path, data).await
    }

    /// Waits for the exclusive lock of the document stored under `key`.
    ///
    /// The document itself need not exist. The lock file sits next to it and is never removed.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidName`] for a bad key and [`StorageError::Io`] if the lock
    /// file cannot be opened or locked.
    pub async fn lock(&self, key: &str) -> Result<DocumentLock, StorageError> {
        let path = self.file_for(key, LOCK_EXT)?;
        self.storage.lock_file(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_names_are_normalized() {
        let name = CollectionName::try_from("Variables").unwrap();
        assert_eq!(name.as_ref(), "variables");
    }

    #[test]
    fn test_collection_names_reject_separators() {
        for bad in ["", "../etc", "a/b", "a.b", "sp ace"] {
            assert!(
                matches!(CollectionName::try_from(bad), Err(StorageError::InvalidName { .. })),
                "{bad:?} must be rejected"
            );
        }
    }
}
