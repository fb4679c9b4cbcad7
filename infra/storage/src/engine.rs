//! Core storage engine providing sandboxed, atomic and optionally compressed file I/O.
//!
//! The [`Storage`] handle owns the physical root directory. Data is only reachable through
//! [`Collection`] views, whose directory and file names are derived from validated names, so
//! no caller-supplied string ever becomes a path component verbatim.

use crate::builder::StorageBuilder;
use crate::collection::{Collection, CollectionName};
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance;
use fs4::fs_std::FileExt;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Marker in the file name of in-flight writes.
pub(crate) const TMP_MARKER: &str = ".sboxtmp.";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    fn compress(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::None => data.to_vec(),
            Self::Lz4 => lz4_flex::compress_prepend_size(data),
        }
    }

    fn decompress(self, data: Vec<u8>) -> Result<Vec<u8>, StorageError> {
        match self {
            Self::None => Ok(data),
            Self::Lz4 => {
                lz4_flex::decompress_size_prepended(&data).context("Lz4 decompression failed")
            },
        }
    }
}

/// The internal shared state of a [`Storage`] instance.
#[derive(Debug)]
pub struct StorageInner {
    /// The canonicalized physical path on the disk where all data is stored.
    pub(crate) root: PathBuf,
    pub(crate) compression: Compression,
    /// Random per-handle tag; with the counter it makes temp file names unique.
    pub(crate) instance: u64,
    pub(crate) tmp_counter: AtomicU64,
}

/// Exclusive advisory lock on one document, released on drop.
///
/// Backed by an OS file lock, so it is honoured by every [`Storage`] handle and every process
/// working on the same root.
#[derive(Debug)]
#[must_use = "The lock is released as soon as the guard is dropped"]
pub struct DocumentLock {
    _file: std::fs::File,
}

/// A thread-safe handle to the storage engine.
///
/// This handle is internally reference-counted (`Arc`) and can be cheaply cloned
/// across threads or tasks.
///
/// # Example
///
/// ```rust
/// use sbox_storage::{Compression, Storage, StorageError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), StorageError> {
///     # let tmp = tempfile::tempdir().unwrap();
///     # let root = tmp.path().join("data");
///     let storage = Storage::builder(&root)
///         .create(true)
///         .compression(Compression::Lz4)
///         .connect()
///         .await?;
///
///     let variables = storage.collection("variables")?;
///     {
///         let _lock = variables.lock("proj-1").await?;
///         variables.write("proj-1", br#"[{"name":"TOKEN"}]"#).await?;
///     }
///
///     assert!(variables.read("proj-1").await?.is_some());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Storage {
    pub(crate) inner: Arc<StorageInner>,
}

impl Deref for Storage {
    type Target = StorageInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Storage {
    pub fn builder(root: impl Into<PathBuf>) -> StorageBuilder {
        StorageBuilder::new(root.into())
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    #[must_use]
    pub fn compression(&self) -> Compression {
        self.inner.compression
    }

    /// Returns a view over one named collection of documents.
    ///
    /// # Constraints
    /// - Names must be **alphanumeric** (a-z, 0-9) or use **underscores** (`_`).
    /// - Names are automatically converted to **lowercase**.
    /// - Empty names are prohibited.
    ///
    /// # Errors
    /// Returns [`StorageError::InvalidName`] if the name is empty or contains illegal characters.
    pub fn collection<N>(&self, name: N) -> Result<Collection, StorageError>
    where
        N: TryInto<CollectionName, Error = StorageError>,
    {
        Ok(Collection::new(self.clone(), name.try_into()?))
    }

    /// Removes temporary files abandoned by interrupted writes.
    pub async fn purge_tmp(&self) {
        maintenance::purge_tmp(&self.inner.root).await;
    }

    /// Reads a file, returning `None` when it does not exist.
    pub(crate) async fn read_file(&self, path: &Path) -> Result<Option<Vec<u8>>, StorageError> {
        match fs::read(path).await {
            Ok(data) => self.inner.compression.decompress(data).map(Some),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::Io {
                source: err,
                context: Some(format!("Read failed: {}", path.display()).into()),
            }),
        }
    }

    /// Blocks on a worker thread until the lock file at `path` is exclusively held.
    pub(crate) async fn lock_file(&self, path: PathBuf) -> Result<DocumentLock, StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Failed to create directory {}", parent.display()))?;
        }

        let file = tokio::task::spawn_blocking(move || {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(false)
                .read(true)
                .write(true)
                .open(&path)
                .context(format!("Failed to open lock {}", path.display()))?;
            FileExt::lock_exclusive(&file).context(format!("Failed to lock {}", path.display()))?;
            Ok::<_, StorageError>(file)
        })
        .await
        .map_err(|e| StorageError::Internal {
            message: "Lock task failed".into(),
            context: Some(e.to_string().into()),
        })??;

        Ok(DocumentLock { _file: file })
    }

    /// Replaces a file atomically: unique temp file, `fsync`, `rename`, then a parent
    /// directory sync. Readers observe either the old or the new content, never a mix.
    pub(crate) async fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        let parent = path.parent().ok_or("Document path has no parent directory")?;
        fs::create_dir_all(parent)
            .await
            .context(format!("Failed to create directory {}", parent.display()))?;

        let temp = unique_tmp_path(path, self.inner.instance, &self.inner.tmp_counter);
        let encoded = self.inner.compression.compress(data);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(&encoded).await.context("Write failed")?;
            file.sync_all().await.context("Hardware sync failed")?;
        }

        if let Err(err) = fs::rename(&temp, path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(StorageError::Io {
                source: err,
                context: Some(
                    format!("Atomic swap failed: {} -> {}", temp.display(), path.display()).into(),
                ),
            });
        }

        sync_dir(parent).await;

        debug!(path = %path.display(), bytes = encoded.len(), "Document saved atomically");
        Ok(())
    }
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}

fn unique_tmp_path(target: &Path, instance: u64, counter: &AtomicU64) -> PathBuf {
    let n = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("document");
    target.with_file_name(format!("{file_name}{TMP_MARKER}{instance:016x}.{n}"))
}
