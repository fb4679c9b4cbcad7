//! # Logger
//!
//! Installs the process-wide `tracing` subscriber: a compact console layer, an optional rolling
//! file layer (plain or JSON) written through a non-blocking worker, and an `EnvFilter` that
//! honours `RUST_LOG` unless an explicit filter is supplied.
//!
//! ## Example
//!
//! ```rust
//! # use sbox_logger::{Logger, LevelFilter};
//! let _logger = Logger::builder("strongbox")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// Rolling file output settings.
#[derive(Debug, Clone)]
struct FileSink {
    dir: PathBuf,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

/// A builder for configuring and initializing the global tracing subscriber.
#[derive(Debug)]
pub struct LoggerBuilder {
    name: String,
    console: bool,
    level: LevelFilter,
    filter: Option<String>,
    file: Option<FileSink>,
}

impl LoggerBuilder {
    /// Minimum level emitted when no directive matches.
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Explicit filter directives (e.g. `sbox_variables=debug,sbox_storage=warn`).
    ///
    /// Takes precedence over `RUST_LOG`. Invalid directives make [`LoggerBuilder::init`] fail.
    #[must_use]
    pub fn filter(mut self, directives: impl Into<String>) -> Self {
        self.filter = Some(directives.into()).filter(|d: &String| !d.trim().is_empty());
        self
    }

    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Writes log files named `<name>.<date>.log` into `dir`, rotated daily by default.
    #[must_use]
    pub fn file(mut self, dir: impl Into<PathBuf>) -> Self {
        self.file = Some(FileSink {
            dir: dir.into(),
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        });
        self
    }

    /// Rotation of the file sink. No effect without [`LoggerBuilder::file`].
    #[must_use]
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        if let Some(sink) = self.file.as_mut() {
            sink.rotation = rotation;
        }
        self
    }

    /// Number of rotated files kept. No effect without [`LoggerBuilder::file`].
    #[must_use]
    pub fn max_files(mut self, max: usize) -> Self {
        if let Some(sink) = self.file.as_mut() {
            sink.max_files = max;
        }
        self
    }

    /// Emits file records as JSON objects. No effect without [`LoggerBuilder::file`].
    #[must_use]
    pub fn json(mut self, enabled: bool) -> Self {
        if let Some(sink) = self.file.as_mut() {
            sink.json = enabled;
        }
        self
    }

    /// Consumes the builder and installs the global tracing subscriber.
    ///
    /// # Returns
    /// A [`Logger`] handle. It owns the [`WorkerGuard`] of the file writer and must be kept
    /// alive until shutdown so buffered records are flushed.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero `max_files`, bad filter
    ///   directives, or when neither console nor file output is enabled.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] if the log directory is unusable.
    /// * [`LoggerError::Subscriber`] if a global subscriber has already been set.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.validate()?;
        let env_filter = self.env_filter()?;

        let mut layers = Vec::new();
        if self.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = match &self.file {
            Some(sink) => {
                fs::create_dir_all(&sink.dir)
                    .context(format!("Failed to create {}", sink.dir.display()))?;

                let appender = RollingFileAppender::builder()
                    .rotation(sink.rotation.clone())
                    .filename_prefix(&self.name)
                    .filename_suffix(LOG_FILE_SUFFIX)
                    .max_log_files(sink.max_files)
                    .build(&sink.dir)?;
                let (writer, guard) = tracing_appender::non_blocking(appender);

                let file_layer = layer().with_writer(writer).with_ansi(false);
                layers.push(if sink.json { file_layer.json().boxed() } else { file_layer.boxed() });
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;
        tracing::debug!(name = %self.name, file = self.file.is_some(), "Logging initialized");

        Ok(Logger { guard })
    }

    fn validate(&self) -> Result<(), LoggerError> {
        if self.name.trim().is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "Logger name cannot be empty".into(),
                context: None,
            });
        }
        if self.file.as_ref().is_some_and(|sink| sink.max_files == 0) {
            return Err(LoggerError::InvalidConfiguration {
                message: "max_files must be greater than zero".into(),
                context: None,
            });
        }
        if !self.console && self.file.is_none() {
            return Err(LoggerError::InvalidConfiguration {
                message: "No logging output enabled. Enable console or file output.".into(),
                context: None,
            });
        }
        Ok(())
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        match &self.filter {
            Some(directives) => {
                builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                    message: format!("Invalid filter '{directives}': {e}").into(),
                    context: None,
                })
            },
            None => Ok(builder.from_env_lossy()),
        }
    }
}

/// A handle to the initialized logging system.
///
/// Drop it only when the application is shutting down.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    /// Returns a new [`LoggerBuilder`].
    ///
    /// `name` prefixes rolling log files (e.g. `strongbox.2026-10-19.log`). Console output is
    /// enabled and the level is `INFO` until changed.
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder {
            name: name.into(),
            console: true,
            level: LevelFilter::INFO,
            filter: None,
            file: None,
        }
    }

    /// Whether records are also written to files.
    #[must_use]
    pub const fn has_file_output(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}

/// Parses a level name such as `"debug"` or `"off"`, case-insensitively.
///
/// # Errors
/// [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_level(value: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(value.trim()).map_err(|_| LoggerError::InvalidConfiguration {
        message: format!("Unknown log level '{value}'").into(),
        context: Some("expected one of off, error, warn, info, debug, trace".into()),
    })
}

/// Parses a rotation name: `minutely`, `hourly`, `daily`, `weekly` or `never`.
///
/// # Errors
/// [`LoggerError::InvalidConfiguration`] for unknown names.
pub fn parse_rotation(value: &str) -> Result<Rotation, LoggerError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "minutely" => Ok(Rotation::MINUTELY),
        "hourly" => Ok(Rotation::HOURLY),
        "daily" => Ok(Rotation::DAILY),
        "weekly" => Ok(Rotation::WEEKLY),
        "never" => Ok(Rotation::NEVER),
        _ => Err(LoggerError::InvalidConfiguration {
            message: format!("Unknown log rotation '{value}'").into(),
            context: None,
        }),
    }
}
