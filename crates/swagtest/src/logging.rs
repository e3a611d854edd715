//! Log subscriber setup.
//!
//! The library only emits `tracing` events; binaries call [`init`] once.
//! `RUST_LOG` wins over the level picked here.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter directive
pub const DEFAULT_FILTER: &str = "swagtest=info";

/// Log output options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Filter used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit one JSON object per event
    pub json: bool,
    /// Colourise human output
    pub ansi: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            json: false,
            ansi: true,
        }
    }
}

impl LogOptions {
    /// Filter for a `-v` count: 0 keeps info, 1 is debug, 2+ is trace.
    /// `quiet` drops to warnings.
    #[must_use]
    pub fn for_verbosity(verbose: u8, quiet: bool) -> Self {
        let level = match (quiet, verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        };
        Self {
            filter: format!("swagtest={level},swagtest_cli={level}"),
            ..Self::default()
        }
    }

    /// Switch to JSON lines
    #[must_use]
    pub const fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Toggle ANSI colours
    #[must_use]
    pub const fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.filter))
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Returns `false` when a subscriber was already installed.
pub fn init(options: &LogOptions) -> bool {
    let registry = tracing_subscriber::registry().with(options.env_filter());
    let installed = if options.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_ansi(options.ansi)
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogOptions::for_verbosity(0, false).filter, "swagtest=info,swagtest_cli=info");
        assert_eq!(LogOptions::for_verbosity(1, false).filter, "swagtest=debug,swagtest_cli=debug");
        assert_eq!(LogOptions::for_verbosity(3, false).filter, "swagtest=trace,swagtest_cli=trace");
        assert_eq!(LogOptions::for_verbosity(2, true).filter, "swagtest=warn,swagtest_cli=warn");
    }

    #[test]
    fn test_default_options() {
        let options = LogOptions::default();
        assert_eq!(options.filter, DEFAULT_FILTER);
        assert!(!options.json);
        assert!(LogOptions::default().with_json(true).with_ansi(false).json);
    }

    #[test]
    fn test_second_init_is_rejected() {
        let options = LogOptions::default().with_ansi(false);
        let _ = init(&options);
        assert!(!init(&options));
    }
}
