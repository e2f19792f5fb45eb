#![forbid(unsafe_code)]

//! Subscriber setup for binaries.
//!
//! Library crates only emit `tracing` events. A binary calls [`init`] once
//! to print them to stderr. Verbosity comes from `FOLIO_LOG`, then
//! `RUST_LOG`, then the default `info`.

use std::fmt;
use std::io::IsTerminal;
use std::str::FromStr;

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "FOLIO_LOG";

const DEFAULT_DIRECTIVES: &str = "info";

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Plain,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            _ => Err(LoggingError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Plain => "plain",
            Self::Json => "json",
        })
    }
}

/// Pick filter directives: `FOLIO_LOG` wins over `RUST_LOG`, which wins over
/// `default`. Blank values are skipped.
#[must_use]
pub fn pick_directives(folio_log: Option<&str>, rust_log: Option<&str>, default: &str) -> String {
    [folio_log, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|d| !d.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Filter from the environment.
pub fn env_filter(default: &str) -> Result<EnvFilter, LoggingError> {
    let folio_log = std::env::var(LOG_ENV).ok();
    let rust_log = std::env::var("RUST_LOG").ok();
    let directives = pick_directives(folio_log.as_deref(), rust_log.as_deref(), default);
    EnvFilter::try_new(&directives).map_err(|e| LoggingError::Filter {
        directives,
        message: e.to_string(),
    })
}

/// Build a subscriber writing to `writer`.
pub fn subscriber<W>(
    format: LogFormat,
    filter: EnvFilter,
    writer: W,
    ansi: bool,
) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (plain, json) = match format {
        LogFormat::Plain => (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(ansi),
            ),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(tracing_subscriber::fmt::layer().json().with_writer(writer)),
        ),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(plain)
        .with(json)
}

/// Install the global subscriber on stderr.
pub fn init(format: LogFormat) -> Result<(), LoggingError> {
    let filter = env_filter(DEFAULT_DIRECTIVES)?;
    let ansi = std::io::stderr().is_terminal();
    subscriber(format, filter, std::io::stderr, ansi)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    UnknownFormat(String),
    /// The filter directives did not parse.
    Filter { directives: String, message: String },
    /// A global subscriber was already installed.
    Init(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFormat(s) => write!(f, "unknown log format {s:?} (expected plain or json)"),
            Self::Filter {
                directives,
                message,
            } => write!(f, "invalid log filter {directives:?}: {message}"),
            Self::Init(message) => write!(f, "logging already initialized: {message}"),
        }
    }
}

impl std::error::Error for LoggingError {}
