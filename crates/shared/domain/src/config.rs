use serde::Deserialize;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration of a Strongbox instance.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StrongboxConfigInner {
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub encryption: EncryptionConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
///
/// Deserializes straight through [`StrongboxConfigInner`] so layered sources keep their
/// string-to-scalar coercions.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(from = "StrongboxConfigInner")]
pub struct StrongboxConfig {
    inner: Arc<StrongboxConfigInner>,
}

impl From<StrongboxConfigInner> for StrongboxConfig {
    fn from(inner: StrongboxConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Deref for StrongboxConfig {
    type Target = StrongboxConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for StrongboxConfig {
    fn deref_mut(&mut self) -> &mut StrongboxConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Logging output settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub name: String,
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub level: String,
    /// Filter directives; when empty `RUST_LOG` applies.
    pub filter: String,
    pub console: bool,
    /// Directory for rolling log files; `None` disables file output.
    pub dir: Option<PathBuf>,
    /// `minutely`, `hourly`, `daily`, `weekly` or `never`.
    pub rotation: String,
    pub max_files: usize,
    pub json: bool,
}

/// Where variable records are persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; contents are lost on exit.
    Memory,
    /// One JSON document per owner below `data_dir`.
    #[default]
    File,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    /// LZ4-compress stored documents.
    pub compression: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherAlgorithm {
    #[default]
    Aes,
    Chacha,
}

/// Value encryption key settings.
///
/// Exactly one of `key` (base64 of 32 random bytes) or `secret` (HKDF input, combined with
/// `salt`) must be set.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct EncryptionConfig {
    pub algorithm: CipherAlgorithm,
    pub key: Option<String>,
    pub secret: Option<String>,
    pub salt: String,
    /// LZ4-compress values before encryption.
    pub compression: bool,
}

impl fmt::Debug for EncryptionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionConfig")
            .field("algorithm", &self.algorithm)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("salt", &self.salt)
            .field("compression", &self.compression)
            .finish()
    }
}

// --- Default ---

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: crate::constants::APP_NAME.to_owned(),
            level: "info".to_owned(),
            filter: String::new(),
            console: true,
            dir: None,
            rotation: "daily".to_owned(),
            max_files: 10,
            json: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: StorageBackend::File, data_dir: PathBuf::from("data"), compression: false }
    }
}
