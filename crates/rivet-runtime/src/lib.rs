//! Rivet Runtime - configuration and logging for the Rivet rule engine.
//!
//! This crate provides:
//! - Layered configuration (`RivetConfig`) from defaults, TOML files and
//!   `RIVET_*` environment variables
//! - Validation of the loaded settings
//! - `tracing-subscriber` setup driven by the `[logging]` section
//!
//! ```ignore
//! use rivet_runtime::init;
//!
//! let config = init()?;
//! let rule_config = config.rules.rule_config();
//! let picture = config.rules.must_provide_picture(futures.clone());
//! ```

pub mod config;
pub mod logging;

pub use config::{
    ConfigError, ConfigLoader, ConfigResult, LoggingConfig, RivetConfig, RulesConfig, SpanEventConfig,
    load_config, validate_config,
};
pub use logging::{LoggingBuilder, init_from_config};

/// Loads and validates the configuration, then installs the logger.
pub fn init() -> ConfigResult<RivetConfig> {
    init_with(ConfigLoader::new())
}

/// Like [`init`], with a caller-prepared loader.
pub fn init_with(loader: ConfigLoader) -> ConfigResult<RivetConfig> {
    let config = loader.load()?;
    validate_config(&config)?;
    init_from_config(&config.logging);
    tracing::info!(
        super_users = config.rules.super_users.len(),
        prefix = %config.rules.command_prefix,
        "rivet initialized"
    );
    Ok(config)
}

/// Re-exports of the `tracing` macros.
pub mod prelude {
    pub use tracing::{debug, error, info, instrument, trace, warn};
}
