//! Logging initialisation
//!
//! The engine logs through `tracing` macros with structured fields; this
//! module installs a `tracing_subscriber` formatter for binaries and hosts
//! that don't configure their own.
//!
//! ```rust,ignore
//! use change_audit::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::new("debug"))?;
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::AuditError;

/// Subscriber settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter used when RUST_LOG is not set, e.g. "info" or "change_audit=debug"
    pub level: String,
    /// Include module targets in output
    pub with_target: bool,
}

impl LogConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            with_target: false,
        }
    }

    /// The filter to install: RUST_LOG wins over the configured level
    pub fn env_filter(&self) -> Result<EnvFilter, AuditError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level).map_err(|e| {
                AuditError::Settings(format!("Invalid log level '{}': {}", self.level, e))
            }),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("info")
    }
}

/// Install a global subscriber writing to stderr.
///
/// Calling this when a subscriber is already installed is a no-op.
pub fn init_logging(config: &LogConfig) -> Result<(), AuditError> {
    let filter = config.env_filter()?;

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.with_target);

    // Err means a global subscriber already exists
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();

    Ok(())
}
