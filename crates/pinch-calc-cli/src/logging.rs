//! Logging setup using `tracing-subscriber`
//!
//! Logs go to stderr so stdout stays clean for results. `RUST_LOG` takes
//! precedence over the level derived from `-v`/`-q`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Verbosity;
use crate::error::{CliError, CliResult};

/// Logging options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogConfig {
    /// Verbosity the default filter is derived from
    pub verbosity: Verbosity,
    /// Whether to use ANSI colors
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            with_ansi: false,
        }
    }
}

impl LogConfig {
    /// Create a `LogConfig` for a verbosity
    #[must_use]
    pub const fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            with_ansi: false,
        }
    }

    /// Enable or disable ANSI colors
    #[must_use]
    pub const fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

/// Builds the filter: `RUST_LOG` if set and valid, otherwise the verbosity level
#[must_use]
pub fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()))
}

/// Installs the global subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) -> CliResult<()> {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(config.verbosity.is_debug())
        .without_time();

    tracing_subscriber::registry()
        .with(build_env_filter(config.verbosity))
        .with(layer)
        .try_init()
        .map_err(|e| CliError::logging(e.to_string()))
}
