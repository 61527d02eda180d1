//! Logging setup for the bridge
//!
//! Both pipelines log through `tracing`: one span per phase (walk, notation
//! index, stereotype index, collection, materialization) and events for
//! per-node decisions. Dangling connector ends and failed loads are `warn!`.
//!
//! ```rust,no_run
//! use sysml_bridge::core::logging::init_logging;
//!
//! init_logging(Some("debug"), Some("json")).unwrap();
//! ```
//!
//! Settings left unset come from the environment:
//!
//! - `SYSML_BRIDGE_LOG_LEVEL`, then `RUST_LOG`, then `info`
//! - `SYSML_BRIDGE_LOG_FORMAT`, then `compact`
//!
//! Directives work per module, e.g.
//! `RUST_LOG="info,sysml_bridge::export::walker=trace"` shows every
//! classification while keeping the rest at info.

use std::str::FromStr;
use thiserror::Error;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer, Registry,
};

const LEVEL_ENV: &str = "SYSML_BRIDGE_LOG_LEVEL";
const FORMAT_ENV: &str = "SYSML_BRIDGE_LOG_FORMAT";
const DEFAULT_LEVEL: &str = "info";

/// Output shape of log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One line per event, no source locations
    #[default]
    Compact,
    /// Multi-line with colors and span enter/exit
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggingError::UnknownFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl LogFormat {
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }

    /// The fmt layer for this format, writing to stderr
    ///
    /// Stdout is reserved for graph and listing output.
    fn layer(self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let base = fmt::layer().with_writer(std::io::stderr).with_level(true);
        match self {
            LogFormat::Compact => base
                .compact()
                .with_target(false)
                .with_span_events(FmtSpan::NONE)
                .boxed(),
            LogFormat::Pretty => base
                .pretty()
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE)
                .boxed(),
            LogFormat::Json => base
                .json()
                .with_current_span(true)
                .with_span_events(FmtSpan::CLOSE)
                .boxed(),
        }
    }
}

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Unknown log format '{format}', expected one of: compact, pretty, json")]
    UnknownFormat { format: String },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

/// Level directives and format after falling back to the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub directives: String,
    pub format: LogFormat,
}

impl LogSettings {
    pub fn resolve(level: Option<&str>, format: Option<&str>) -> Result<Self, LoggingError> {
        let directives = level
            .map(str::to_string)
            .or_else(|| std::env::var(LEVEL_ENV).ok())
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string());
        let format = match format
            .map(str::to_string)
            .or_else(|| std::env::var(FORMAT_ENV).ok())
        {
            Some(name) => name.parse()?,
            None => LogFormat::default(),
        };
        Ok(Self { directives, format })
    }

    /// Filter for the directives; directives that do not parse mean `info`
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    }
}

/// Install the global subscriber
///
/// Fails on an unknown format, or when a subscriber is already installed.
pub fn init_logging(level: Option<&str>, format: Option<&str>) -> Result<(), LoggingError> {
    let settings = LogSettings::resolve(level, format)?;
    Registry::default()
        .with(settings.format.layer())
        .with(settings.filter())
        .try_init()?;
    Ok(())
}

/// Install the subscriber with environment settings only
pub fn init_default_logging() -> Result<(), LoggingError> {
    init_logging(None, None)
}
