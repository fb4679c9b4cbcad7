use crate::Strongbox;
use crate::backend::Backend;
use crate::error::{StrongboxError, StrongboxErrorExt};
use sbox_domain::config::{CipherAlgorithm, EncryptionConfig, StorageBackend, StrongboxConfig};
use sbox_storage::{Compression, Storage};
use sbox_variables::{FileRepository, MemoryRepository, VariableStore, value_pipeline};
use sbox_vault::algorithms::{Aes, ChaCha, VaultCipher};
use sbox_vault::transform::Pipeline;
use sbox_vault::{Vault, VaultBuilder, WithKey};
use std::path::PathBuf;
use tracing::info;

/// A fluent builder for configuring and initializing a [`Strongbox`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct StrongboxBuilder {
    cfg: StrongboxConfig,
}

impl StrongboxBuilder {
    /// Replaces the whole configuration.
    pub fn config(mut self, cfg: StrongboxConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Keeps variables in process memory only.
    pub fn memory(mut self) -> Self {
        self.cfg.storage.backend = StorageBackend::Memory;
        self
    }

    /// Persists variables below `dir`.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.storage.backend = StorageBackend::File;
        self.cfg.storage.data_dir = dir.into();
        self
    }

    /// Consumes the builder and opens the store.
    ///
    /// # Process
    /// 1. Builds the vault from the encryption settings and wipes the key material
    /// 2. Assembles the value pipeline
    /// 3. Opens the configured repository
    ///
    /// # Errors
    /// * [`StrongboxError::InvalidConfiguration`] unless exactly one of `key` or `secret` is set,
    ///   or when a secret comes without a salt.
    /// * [`StrongboxError::Vault`] if the key is malformed.
    /// * [`StrongboxError::Storage`] if the data directory cannot be prepared.
    pub async fn build(self) -> Result<Strongbox, StrongboxError> {
        let pipeline = match self.cfg.encryption.algorithm {
            CipherAlgorithm::Aes => pipeline::<Aes>(&self.cfg.encryption)?,
            CipherAlgorithm::Chacha => pipeline::<ChaCha>(&self.cfg.encryption)?,
        };

        let backend = self.open_backend().await?;

        info!(
            backend = backend.name(),
            algorithm = ?self.cfg.encryption.algorithm,
            stages = ?pipeline.stage_names(),
            "Strongbox ready"
        );

        Ok(Strongbox { store: VariableStore::new(backend, pipeline), config: self.cfg })
    }

    async fn open_backend(&self) -> Result<Backend, StrongboxError> {
        let storage_cfg = &self.cfg.storage;
        match storage_cfg.backend {
            StorageBackend::Memory => Ok(Backend::Memory(MemoryRepository::new())),
            StorageBackend::File => {
                let compression =
                    if storage_cfg.compression { Compression::Lz4 } else { Compression::None };
                let storage = Storage::builder(&storage_cfg.data_dir)
                    .create(true)
                    .compression(compression)
                    .connect()
                    .await
                    .context(format!("data_dir {}", storage_cfg.data_dir.display()))?;
                Ok(Backend::File(FileRepository::new(&storage)?))
            },
        }
    }
}

fn pipeline<C: VaultCipher>(cfg: &EncryptionConfig) -> Result<Pipeline, StrongboxError> {
    let vault = key_source::<C>(cfg)?.build()?;
    Ok(value_pipeline(vault, cfg.compression))
}

fn key_source<C: VaultCipher>(
    cfg: &EncryptionConfig,
) -> Result<VaultBuilder<C, WithKey>, StrongboxError> {
    let builder = Vault::<C>::builder();
    match (cfg.key.as_deref(), cfg.secret.as_deref()) {
        (Some(key), None) => builder.key_base64(key).context("encryption.key"),
        (None, Some(secret)) => {
            if cfg.salt.is_empty() {
                return Err(StrongboxError::InvalidConfiguration {
                    message: "A key derivation secret needs a salt".into(),
                    context: Some("encryption.salt".into()),
                });
            }
            builder.derived_key(secret, &cfg.salt).context("encryption.secret")
        },
        (Some(_), Some(_)) => Err(StrongboxError::InvalidConfiguration {
            message: "Set either an encryption key or a secret, not both".into(),
            context: None,
        }),
        (None, None) => Err(StrongboxError::InvalidConfiguration {
            message: "No encryption key configured".into(),
            context: Some("set encryption.key or encryption.secret".into()),
        }),
    }
}
