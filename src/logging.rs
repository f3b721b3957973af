//! Logging configuration and initialization
//!
//! Verbosity follows the host plugin convention: `LOG_LEVEL` selects one of
//! `none`, `info` (default) or `verbose`, and `--verbose` forces `verbose`.
//! `--quiet` forces `none`. When `RUST_LOG` is set it wins over all of these.
//!
//! At `info` only the install summary, reference replacement notices and
//! warnings are shown. `verbose` adds per-layer and per-reference detail and
//! the effective configuration. The full transformed template is only logged
//! at `trace` (`RUST_LOG=transform=trace`).

use std::fmt;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Environment variable selecting the verbosity level.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Verbosity level of the layer manager's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Errors only
    None,
    /// Summaries and warnings
    #[default]
    Info,
    /// Everything down to debug
    Verbose,
}

impl LogLevel {
    /// Resolve the effective level from CLI flags and the `LOG_LEVEL` value.
    ///
    /// Unrecognized `LOG_LEVEL` values fall back to [`LogLevel::Info`].
    pub fn resolve(verbose: bool, quiet: bool, env_value: Option<&str>) -> Self {
        if verbose {
            Self::Verbose
        } else if quiet {
            Self::None
        } else {
            env_value.and_then(|value| value.parse().ok()).unwrap_or_default()
        }
    }

    /// `EnvFilter` directive for this level.
    pub const fn filter_directive(self) -> &'static str {
        match self {
            Self::None => "error",
            Self::Info => "info",
            Self::Verbose => "debug",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "info" => Ok(Self::Info),
            "verbose" => Ok(Self::Verbose),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Info => "info",
            Self::Verbose => "verbose",
        })
    }
}

/// Install the global tracing subscriber, writing to stderr.
///
/// stdout is left to the package manager and to `--json` output.
pub fn init_logging(level: LogLevel) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level.filter_directive())
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(level == LogLevel::Verbose)
        .without_time()
        .try_init();

    tracing::debug!("Log level: {}", level);
}
