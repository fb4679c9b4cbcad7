use crate::engine::{Compression, Storage, StorageInner};
use crate::error::{StorageError, StorageErrorExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

/// Settings for opening a [`Storage`] root, created by [`Storage::builder`].
#[derive(Debug, Clone)]
#[must_use = "The storage engine is not initialized until you call .connect()"]
pub struct StorageBuilder {
    root: PathBuf,
    compression: Compression,
    create: bool,
}

impl StorageBuilder {
    pub(crate) const fn new(root: PathBuf) -> Self {
        Self { root, compression: Compression::None, create: true }
    }

    /// Compression applied to every document written through this handle.
    ///
    /// The setting is not recorded in the files; reopen a root with the same value.
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Whether a missing root directory may be created. Enabled by default.
    pub const fn create(mut self, enable: bool) -> Self {
        self.create = enable;
        self
    }

    /// Resolves the root and returns a ready handle.
    ///
    /// The root is canonicalized so later joins cannot be redirected by symlinks in the
    /// configured path. Stale temporary files are swept afterwards; sweep failures are only
    /// logged.
    ///
    /// # Errors
    ///
    /// * [`StorageError::Io`] if the root is missing and `create` is off, is not a directory,
    ///   or cannot be created or resolved.
    /// * [`StorageError::Internal`] if the system RNG is unavailable.
    pub async fn connect(self) -> Result<Storage, StorageError> {
        let root = resolve_root(&self.root, self.create).await?;
        let instance = instance_tag()?;

        info!(
            path = %root.display(),
            compression = ?self.compression,
            instance = %format!("{instance:016x}"),
            "Storage root ready"
        );

        let storage = Storage {
            inner: Arc::new(StorageInner {
                root,
                compression: self.compression,
                instance,
                tmp_counter: AtomicU64::new(0),
            }),
        };
        storage.purge_tmp().await;
        Ok(storage)
    }
}

async fn resolve_root(path: &Path, create: bool) -> Result<PathBuf, StorageError> {
    if create {
        fs::create_dir_all(path)
            .await
            .context(format!("Failed to create storage root {}", path.display()))?;
    }

    let root = fs::canonicalize(path)
        .await
        .context(format!("Failed to resolve storage root {}", path.display()))?;

    let meta = fs::metadata(&root).await.context(format!("Failed to stat {}", root.display()))?;
    if !meta.is_dir() {
        return Err(StorageError::Io {
            source: std::io::Error::new(std::io::ErrorKind::NotADirectory, "not a directory"),
            context: Some(format!("Storage root {}", root.display()).into()),
        });
    }
    Ok(root)
}

/// Random tag that keeps temp file names of concurrent handles on one root apart.
fn instance_tag() -> Result<u64, StorageError> {
    let mut bytes = [0u8; 8];
    getrandom::fill(&mut bytes).map_err(|e| StorageError::Internal {
        message: "System RNG unavailable".into(),
        context: Some(e.to_string().into()),
    })?;
    Ok(u64::from_le_bytes(bytes))
}
