//! Configuration module for the Rivet runtime.
//!
//! Settings are layered with figment: built-in defaults, then a TOML file,
//! then `RIVET_*` environment variables. The rule section converts into the
//! [`RuleConfig`](rivet_framework::RuleConfig) handed to rule constructors.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config};
pub use schema::{
    LogFormat, LogLevel, LogOutput, LoggingConfig, RivetConfig, RulesConfig, SpanEventConfig,
};
pub use validation::validate_config;
