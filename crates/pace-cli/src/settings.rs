//! Layered settings
//!
//! Built-in defaults, then an optional settings file, then `PACE_*`
//! environment variables. Command-line flags are applied on top by
//! [`Cli::apply`](crate::Cli::apply).

use pace_pipeline::{PipelineConfig, DEFAULT_CAPACITY, DEFAULT_READ_CHUNK};
use pace_timer::{PaceError, PacingConfig, TimerKind, DEFAULT_BAUD};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::Level;

/// Environment variable prefix
const ENV_PREFIX: &str = "PACE";

/// Errors while resolving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file or environment could not be read
    #[error("Invalid settings: {0}")]
    Config(#[from] config::ConfigError),

    /// Pace out of range
    #[error(transparent)]
    Pace(#[from] PaceError),

    /// Both a baud rate and an interval were given
    #[error("Baud rate and nanoseconds per byte are mutually exclusive")]
    ConflictingPace,

    /// Zero-sized ring buffer
    #[error("Buffer size must be at least 1 byte")]
    ZeroBufferSize,

    /// Unparseable log level
    #[error("Invalid log level '{0}'")]
    InvalidLogLevel(String),
}

/// Resolved runtime settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulated UART baud rate
    pub baud: Option<u32>,
    /// Explicit nanoseconds per byte
    pub nanos_per_byte: Option<u32>,
    /// Delay before the first byte too
    pub delay_first_byte: bool,
    /// Ring buffer capacity in bytes
    pub buffer_size: usize,
    /// Largest single input read
    pub read_chunk: usize,
    /// Tick source backend
    pub timer: TimerKind,
    /// Report the pace on stderr and log at info
    pub verbose: bool,
    /// Explicit tracing level, overrides `verbose`
    pub log_level: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            baud: None,
            nanos_per_byte: None,
            delay_first_byte: false,
            buffer_size: DEFAULT_CAPACITY,
            read_chunk: DEFAULT_READ_CHUNK,
            timer: TimerKind::default(),
            verbose: false,
            log_level: None,
        }
    }
}

impl Settings {
    /// Load defaults, the optional file, and `PACE_*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self, SettingsError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(prefix))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Validated pace; defaults to 115200 baud
    pub fn pacing(&self) -> Result<PacingConfig, SettingsError> {
        let pacing = match (self.baud, self.nanos_per_byte) {
            (Some(_), Some(_)) => return Err(SettingsError::ConflictingPace),
            (Some(baud), None) => PacingConfig::from_baud(baud, self.delay_first_byte)?,
            (None, Some(nanos)) => PacingConfig::from_nanos(nanos, self.delay_first_byte)?,
            (None, None) => PacingConfig::from_baud(DEFAULT_BAUD, self.delay_first_byte)?,
        };
        Ok(pacing)
    }

    /// Validated pipeline configuration
    pub fn pipeline_config(&self) -> Result<PipelineConfig, SettingsError> {
        if self.buffer_size == 0 {
            return Err(SettingsError::ZeroBufferSize);
        }
        Ok(PipelineConfig {
            pacing: self.pacing()?,
            capacity: self.buffer_size,
            read_chunk: self.read_chunk,
        })
    }

    /// Tracing level: explicit `log_level`, else info when verbose, else warn
    pub fn log_level(&self) -> Result<Level, SettingsError> {
        match &self.log_level {
            Some(level) => level
                .parse()
                .map_err(|_| SettingsError::InvalidLogLevel(level.clone())),
            None if self.verbose => Ok(Level::INFO),
            None => Ok(Level::WARN),
        }
    }
}
