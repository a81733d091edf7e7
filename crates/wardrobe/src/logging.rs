//! Subscriber setup.
//!
//! The engine only emits `tracing` events; hosts and binaries decide where
//! they go. `RUST_LOG` overrides the configured level.

use tracing::Level;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError, EnvFilter,
};

/// Crates whose events follow the configured level.
const WARDROBE_TARGETS: [&str; 4] = ["wardrobe", "wardrobe_core", "wardrobe_engine", "wardrobe_shared"];

/// Output layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-field human readable output.
    #[default]
    Full,
    /// One line per event.
    Compact,
}

/// Logging options.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Level for the wardrobe crates. Everything else stays at `warn`.
    pub level: Level,
    /// Include the module path.
    pub with_target: bool,
    /// Colored output.
    pub with_ansi: bool,
    /// Output layout.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            with_target: true,
            with_ansi: true,
            format: LogFormat::default(),
        }
    }
}

impl LogConfig {
    /// Level from a `-v` count: 0 is info, 1 debug, anything more trace.
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            ..Self::default()
        }
    }

    /// Sets the output layout.
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Enables or disables colors.
    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }

    /// Filter directives used when `RUST_LOG` is unset.
    #[must_use]
    pub fn default_directives(&self) -> String {
        let level = self.level.as_str().to_lowercase();
        let mut directives = String::from("warn");
        for target in WARDROBE_TARGETS {
            directives.push(',');
            directives.push_str(target);
            directives.push('=');
            directives.push_str(&level);
        }
        directives
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_directives()));

    match config.format {
        LogFormat::Full => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(config.with_target)
                    .with_ansi(config.with_ansi),
            )
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_target(config.with_target)
                    .with_ansi(config.with_ansi)
                    .without_time(),
            )
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(0).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(1).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(7).level, Level::TRACE);
    }

    #[test]
    fn test_default_directives_cover_every_unit() {
        let directives = LogConfig::from_verbosity(1).default_directives();

        assert!(directives.starts_with("warn,"));
        for target in WARDROBE_TARGETS {
            assert!(directives.contains(&format!("{target}=debug")), "{directives}");
        }
    }
}
