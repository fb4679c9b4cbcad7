//! Facade crate for Strongbox.
//! Re-exports the domain, kernel and variables crates and wires them from a
//! [`StrongboxConfig`]. Keep this crate thin: it should compose other crates, not implement
//! business logic.
//!
//! ## Usage
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use sbox::Strongbox;
//! use sbox::domain::config::StrongboxConfig;
//!
//! let mut cfg = StrongboxConfig::default();
//! cfg.encryption.secret = Some("correct horse battery staple".into());
//! cfg.encryption.salt = "deployment-1".into();
//!
//! let strongbox = Strongbox::builder().config(cfg).memory().build().await?;
//! strongbox.set_variable("proj-1", "TOKEN", "abc123").await?;
//! assert_eq!(strongbox.reveal("proj-1", "TOKEN").await?.as_str(), "abc123");
//! # Ok(())
//! # }
//! ```

mod backend;
mod builder;
mod error;

pub use crate::backend::Backend;
pub use crate::builder::StrongboxBuilder;
pub use crate::error::{StrongboxError, StrongboxErrorExt};
pub use sbox_domain as domain;
pub use sbox_kernel as kernel;
pub use sbox_variables as variables;

use sbox_domain::config::{LoggingConfig, StrongboxConfig};
use sbox_logger::{Logger, LoggerError, parse_level, parse_rotation};
use sbox_variables::{Censored, RevealedVariable, VariableError, VariableStore};
use zeroize::Zeroizing;

/// A configured variable store.
#[derive(Debug, Clone)]
pub struct Strongbox {
    store: VariableStore<Backend>,
    config: StrongboxConfig,
}

impl Strongbox {
    pub fn builder() -> StrongboxBuilder {
        StrongboxBuilder::default()
    }

    #[must_use]
    pub const fn config(&self) -> &StrongboxConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &VariableStore<Backend> {
        &self.store
    }

    /// See [`VariableStore::set_variable`].
    ///
    /// # Errors
    /// Propagates [`VariableError`] unchanged.
    pub async fn set_variable(
        &self,
        owner_id: &str,
        name: &str,
        plaintext: &str,
    ) -> Result<(), VariableError> {
        self.store.set_variable(owner_id, name, plaintext).await
    }

    /// See [`VariableStore::list_variables`].
    ///
    /// # Errors
    /// Propagates [`VariableError`] unchanged.
    pub async fn list_variables(&self, owner_id: &str) -> Result<Vec<Censored>, VariableError> {
        self.store.list_variables(owner_id).await
    }

    /// See [`VariableStore::delete_variable`].
    ///
    /// # Errors
    /// Propagates [`VariableError`] unchanged.
    pub async fn delete_variable(&self, owner_id: &str, name: &str) -> Result<(), VariableError> {
        self.store.delete_variable(owner_id, name).await
    }

    /// See [`VariableStore::reveal`].
    ///
    /// # Errors
    /// Propagates [`VariableError`] unchanged.
    pub async fn reveal(
        &self,
        owner_id: &str,
        name: &str,
    ) -> Result<Zeroizing<String>, VariableError> {
        self.store.reveal(owner_id, name).await
    }

    /// See [`VariableStore::reveal_all`].
    ///
    /// # Errors
    /// Propagates [`VariableError`] unchanged.
    pub async fn reveal_all(&self, owner_id: &str) -> Result<Vec<RevealedVariable>, VariableError> {
        self.store.reveal_all(owner_id).await
    }

    /// See [`VariableStore::count_variables`].
    ///
    /// # Errors
    /// Propagates [`VariableError`] unchanged.
    pub async fn count_variables(&self, owner_id: &str) -> Result<usize, VariableError> {
        self.store.count_variables(owner_id).await
    }
}

/// Installs the global tracing subscriber described by `cfg`.
///
/// Keep the returned [`Logger`] alive until shutdown.
///
/// # Errors
/// [`LoggerError::InvalidConfiguration`] for unknown level or rotation names, otherwise see
/// [`sbox_logger::LoggerBuilder::init`].
pub fn init_logging(cfg: &LoggingConfig) -> Result<Logger, LoggerError> {
    let mut builder = Logger::builder(cfg.name.as_str())
        .console(cfg.console)
        .level(parse_level(&cfg.level)?)
        .filter(cfg.filter.as_str());

    if let Some(dir) = &cfg.dir {
        builder = builder
            .file(dir)
            .rotation(parse_rotation(&cfg.rotation)?)
            .max_files(cfg.max_files)
            .json(cfg.json);
    }

    builder.init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_rejects_unknown_names() {
        let cfg = LoggingConfig { level: "chatty".into(), ..LoggingConfig::default() };
        assert!(matches!(init_logging(&cfg), Err(LoggerError::InvalidConfiguration { .. })));

        let cfg = LoggingConfig {
            dir: Some("logs".into()),
            rotation: "fortnightly".into(),
            ..LoggingConfig::default()
        };
        assert!(matches!(init_logging(&cfg), Err(LoggerError::InvalidConfiguration { .. })));
    }
}
