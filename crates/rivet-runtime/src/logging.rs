//! Logging setup on `tracing-subscriber`.
//!
//! The rule layer logs through `tracing`: rejections and matches at `trace`,
//! follow-up waits at `debug`, failed bot lookups at `warn`. Turning on
//! `rivet_framework=trace` shows why each rule passed or failed.
//!
//! ```rust,ignore
//! let config = load_config()?;
//! logging::init_from_config(&config.logging);
//!
//! // or by hand
//! LoggingBuilder::new()
//!     .directive("rivet_framework=trace")
//!     .span_events(SpanEventConfig::LIFECYCLE)
//!     .init();
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::warn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LogLevel, LogOutput, LoggingConfig, SpanEventConfig};

const DEFAULT_LOG_FILE: &str = "rivet.log";

fn fmt_span(events: SpanEventConfig) -> FmtSpan {
    [
        (events.new, FmtSpan::NEW),
        (events.enter, FmtSpan::ENTER),
        (events.exit, FmtSpan::EXIT),
        (events.close, FmtSpan::CLOSE),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .fold(FmtSpan::NONE, |acc, (_, span)| acc | span)
}

/// Initializes logging from configuration.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_from_config(config: &LoggingConfig) {
    let _ = LoggingBuilder::from_config(config).try_init();
}

/// Builder for the global subscriber.
#[derive(Debug, Clone)]
pub struct LoggingBuilder {
    config: LoggingConfig,
    directives: Vec<String>,
    with_target: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    /// Compact output to stdout at `info`.
    pub fn new() -> Self {
        Self::from_config(&LoggingConfig::default())
    }

    /// Creates a builder from a [`LoggingConfig`].
    ///
    /// Per-module `filters` become filter directives.
    pub fn from_config(config: &LoggingConfig) -> Self {
        Self {
            directives: config
                .filters
                .iter()
                .map(|(module, level)| format!("{module}={level}"))
                .collect(),
            config: config.clone(),
            with_target: true,
        }
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// Adds a filter directive such as `rivet_framework=debug`.
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    pub fn span_events(mut self, events: SpanEventConfig) -> Self {
        self.config.span_events = events;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn output(mut self, output: LogOutput) -> Self {
        self.config.output = output;
        self
    }

    /// Sends output to `path` (sets [`LogOutput::File`]).
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = LogOutput::File;
        self.config.file_path = Some(path.into());
        self
    }

    /// Shows the module path of each event (on by default).
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    pub fn with_thread_ids(mut self, enabled: bool) -> Self {
        self.config.thread_ids = enabled;
        self
    }

    /// Shows source file and line of each event.
    pub fn with_source_location(mut self, enabled: bool) -> Self {
        self.config.file_location = enabled;
        self
    }

    /// `RUST_LOG` wins over the configured level; directives are added on top.
    fn build_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.config.level.as_str()));
        for directive in &self.directives {
            match directive.parse() {
                Ok(d) => filter = filter.add_directive(d),
                Err(err) => eprintln!("ignoring invalid log directive {directive:?}: {err}"),
            }
        }
        filter
    }

    /// Installs the subscriber, ignoring a second initialization.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Installs the subscriber.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let filter = self.build_filter();
        let config = &self.config;
        let spans = fmt_span(config.span_events);

        macro_rules! install {
            ($layer:expr, $writer:expr) => {
                tracing_subscriber::registry()
                    .with(
                        $layer
                            .with_writer($writer)
                            .with_span_events(spans.clone())
                            .with_target(self.with_target)
                            .with_thread_ids(config.thread_ids)
                            .with_file(config.file_location)
                            .with_line_number(config.file_location),
                    )
                    .with(filter)
                    .try_init()
            };
        }

        macro_rules! install_with {
            ($writer:expr) => {
                match config.format {
                    #[cfg(feature = "json-log")]
                    LogFormat::Json => install!(fmt::layer().json(), $writer),
                    #[cfg(not(feature = "json-log"))]
                    LogFormat::Json => {
                        eprintln!("JSON logging needs the `json-log` feature, using compact format");
                        install!(fmt::layer().compact(), $writer)
                    }
                    LogFormat::Compact => install!(fmt::layer().compact(), $writer),
                    LogFormat::Full => install!(fmt::layer(), $writer),
                    LogFormat::Pretty => install!(fmt::layer().pretty(), $writer),
                }
            };
        }

        match (config.output, config.file_path.as_deref()) {
            (LogOutput::Stdout, _) => install_with!(std::io::stdout),
            (LogOutput::Stderr, _) => install_with!(std::io::stderr),
            (LogOutput::File, Some(path)) => {
                let (dir, name) = split_log_path(path);
                install_with!(tracing_appender::rolling::never(dir, name))
            }
            (LogOutput::File, None) => {
                let result = install_with!(std::io::stdout);
                warn!("file output requested without a file path, logging to stdout");
                result
            }
        }
    }
}

fn split_log_path(path: &Path) -> (&Path, &OsStr) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE));
    (dir, name)
}
