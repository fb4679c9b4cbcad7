use config::{Config, Environment, File, Map};
use sbox_domain::constants::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

/// Custom error type for config loading.
#[sbox_derive::sbox_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Layered configuration loader: a file source overlaid with `SBOX__`-prefixed environment
/// variables.
///
/// Nested keys are separated by double underscores, so `SBOX__STORAGE__DATA_DIR` maps to
/// `storage.data_dir`. Variables are read from the process environment unless an explicit set
/// is supplied through [`ConfigLoader::env`].
#[derive(Debug, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
    env: Option<Map<String, String>>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Config file to load. The file must exist once a path is set; without one the loader
    /// looks for an optional `strongbox.*` file in the working directory.
    #[must_use]
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replaces the process environment with the given variables.
    #[must_use]
    pub fn env<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.env = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Builds the layered sources and deserializes them into `T`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Config`] if a required file is missing or unparsable, or if the
    /// merged values do not match `T`.
    pub fn load<T>(self) -> Result<T, ConfigError>
    where
        T: DeserializeOwned,
    {
        let (path, required) = match self.path {
            Some(path) => (path, true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let builder = Config::builder()
            .add_source(File::from(path.as_path()).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(self.env),
            );

        info!(path = %path.display(), required, "Loading config");

        let config = builder
            .build()
            .context("Failed to build config")?
            .try_deserialize::<T>()
            .context("Failed to deserialize config")?;

        Ok(config)
    }
}

/// Loads `T` from a config file and `SBOX__*` environment overrides.
///
/// # Errors
/// See [`ConfigLoader::load`].
///
/// # Example
/// ```rust
/// use sbox_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let loader = ConfigLoader::new();
    match path {
        Some(path) => loader.file(path).load(),
        None => loader.load(),
    }
}
