//! Tracing setup for the CLI.
//!
//! Diagnostics destined for users go to stdout/stderr through the command
//! renderers; tracing is for operational detail and always writes to
//! stderr so it never corrupts machine-readable output.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Verbosity selected with `--level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Show all traces.
    Trace,
    /// Show debug and above.
    Debug,
    /// Show info and above.
    Info,
    /// Show warnings and errors only.
    Warn,
    /// Show errors only.
    Error,
}

impl LogLevel {
    const fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Install the global subscriber. `WAG_LOG` overrides the flag when set.
pub fn init(level: LogLevel, json: bool) {
    let filter = EnvFilter::try_from_env("WAG_LOG")
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_strings() {
        assert_eq!(LogLevel::Trace.as_filter(), "trace");
        assert_eq!(LogLevel::Warn.as_filter(), "warn");
    }
}
