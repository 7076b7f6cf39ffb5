//! Configuration schema definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rivet_framework::RuleConfig;
use rivet_framework::future::FutureEvents;
use rivet_framework::rules::MustProvidePicture;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RivetConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Settings consumed by the rule layer.
    #[serde(default)]
    pub rules: RulesConfig,
}

// =============================================================================
// Rules
// =============================================================================

/// Rule layer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Bot owners, in precedence order.
    #[serde(default)]
    pub super_users: Vec<i64>,

    /// Literal that must precede every command name.
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,

    /// How long rules wait for a follow-up message, in seconds.
    #[serde(default = "default_wait_timeout_secs")]
    pub wait_timeout_secs: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            super_users: Vec::new(),
            command_prefix: default_command_prefix(),
            wait_timeout_secs: default_wait_timeout_secs(),
        }
    }
}

fn default_command_prefix() -> String {
    "/".to_string()
}

fn default_wait_timeout_secs() -> u64 {
    120
}

impl RulesConfig {
    /// Builds the shared configuration passed into rule constructors.
    pub fn rule_config(&self) -> Arc<RuleConfig> {
        Arc::new(RuleConfig::from(self))
    }

    /// The follow-up wait timeout.
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// A picture rule that waits for the configured timeout.
    pub fn must_provide_picture(&self, futures: FutureEvents) -> MustProvidePicture {
        MustProvidePicture::new(futures).with_timeout(self.wait_timeout())
    }
}

impl From<&RulesConfig> for RuleConfig {
    fn from(config: &RulesConfig) -> Self {
        RuleConfig::new(
            config.super_users.iter().copied(),
            config.command_prefix.clone(),
        )
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the level name as used in filter directives.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    Json,
}

/// Where log lines go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Requires `file_path`.
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanEventConfig {
    pub new: bool,
    pub enter: bool,
    pub exit: bool,
    pub close: bool,
}

impl SpanEventConfig {
    pub const NONE: Self = Self {
        new: false,
        enter: false,
        exit: false,
        close: false,
    };

    /// Creation and close only.
    pub const LIFECYCLE: Self = Self {
        new: true,
        enter: false,
        exit: false,
        close: true,
    };

    pub const FULL: Self = Self {
        new: true,
        enter: true,
        exit: true,
        close: true,
    };
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level; `RUST_LOG` takes precedence when set.
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Per-module levels, e.g. `rivet_framework = "debug"`.
    pub filters: BTreeMap<String, LogLevel>,
    /// Include thread ids.
    pub thread_ids: bool,
    /// Include source file and line.
    pub file_location: bool,
    /// Log file for `output = "file"`.
    pub file_path: Option<PathBuf>,
    pub span_events: SpanEventConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_defaults() {
        let rules = RulesConfig::default();
        assert_eq!(rules.command_prefix, "/");
        assert_eq!(rules.wait_timeout(), Duration::from_secs(120));

        let config = rules.rule_config();
        assert!(config.super_users.is_empty());
        assert_eq!(config.command_prefix, "/");
    }

    #[test]
    fn test_rule_config_conversion_keeps_order() {
        let rules = RulesConfig {
            super_users: vec![3, 1, 2],
            command_prefix: "#".into(),
            ..Default::default()
        };
        let config = RuleConfig::from(&rules);
        assert_eq!(config.first_super_user(&[1, 2]), Some(1));
        assert_eq!(config.command_prefix, "#");
    }

    #[test]
    fn test_level_names() {
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(LogLevel::Debug.to_tracing_level(), tracing::Level::DEBUG);
    }
}
