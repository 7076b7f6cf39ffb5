//! Configuration loader using figment.
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Programmatic overrides passed to [`ConfigLoader::merge`]
//! 3. Profile-specific config file (`rivet.{profile}.toml`)
//! 4. Main config file (`rivet.toml` or `config.toml`)
//! 5. Environment variables (`RIVET_*`)
//!
//! Config files are only read with the `toml-config` feature.
//!
//! # Environment Variable Mapping
//!
//! Nested keys are separated by `__`:
//!
//! - `RIVET_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `RIVET_RULES__COMMAND_PREFIX=#` → `rules.command_prefix = "#"`
//! - `RIVET_RULES__SUPER_USERS=[10001,10002]` → `rules.super_users = [10001, 10002]`
//!
//! ```rust,ignore
//! let config = ConfigLoader::new()
//!     .file("./deploy/rivet.toml")
//!     .load()?;
//! let owner_only = superuser(config.rules.rule_config());
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Serialized};
#[cfg(feature = "toml-config")]
use figment::providers::{Format, Toml};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::RivetConfig;

const ENV_PREFIX: &str = "RIVET_";

#[cfg(feature = "toml-config")]
const FILE_NAMES: &[&str] = &["rivet.toml", "config.toml"];

/// Configuration profile for environment-specific settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    /// Returns the profile name as used in file names.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Parses a profile name; `dev` and `prod` are accepted as short forms.
    pub fn parse(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Reads `RIVET_PROFILE`, defaulting to development.
    pub fn from_env() -> Self {
        std::env::var("RIVET_PROFILE")
            .map(|name| Self::parse(&name))
            .unwrap_or_default()
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Layered configuration loader.
pub struct ConfigLoader {
    overrides: Figment,
    profile: Profile,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            overrides: Figment::new(),
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::parse(profile.as_ref());
        self
    }

    /// Adds a directory to search for config files.
    ///
    /// Without explicit search paths, the current directory and the user
    /// config directory (`~/.config/rivet` on Linux) are searched.
    pub fn search_path(mut self, path: impl AsRef<Path>) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Loads exactly this file instead of searching. It must exist.
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Skips `RIVET_*` environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Layers a programmatic configuration over the defaults.
    pub fn merge(mut self, config: RivetConfig) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(config));
        self
    }

    /// Loads the configuration.
    pub fn load(self) -> ConfigResult<RivetConfig> {
        let profile = self.profile.clone();
        let config: RivetConfig = self.build_figment()?.extract()?;

        debug!(
            profile = %profile,
            level = %config.logging.level,
            super_users = config.rules.super_users.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    fn build_figment(self) -> ConfigResult<Figment> {
        let mut figment =
            Figment::from(Serialized::defaults(RivetConfig::default())).merge(self.overrides.clone());

        match &self.config_file {
            Some(path) if path.exists() => {
                info!(path = %path.display(), "loading configuration file");
                figment = merge_file(figment, path)?;
            }
            Some(path) => return Err(ConfigError::FileNotFound(path.clone())),
            None => figment = self.search_files(figment),
        }

        if self.load_env {
            trace!(prefix = ENV_PREFIX, "loading environment variables");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }
        Ok(figment)
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("rivet"));
        }
        paths
    }

    /// Merges the first base file found, preceded by its profile variant.
    #[cfg(feature = "toml-config")]
    fn search_files(&self, mut figment: Figment) -> Figment {
        for dir in self.resolve_search_paths() {
            for name in FILE_NAMES {
                let Some((stem, ext)) = name.rsplit_once('.') else {
                    continue;
                };
                let profiled = dir.join(format!("{stem}.{}.{ext}", self.profile));
                if profiled.exists() {
                    debug!(path = %profiled.display(), "loading profile-specific config");
                    figment = figment.merge(Toml::file(&profiled));
                }

                let base = dir.join(name);
                if base.exists() {
                    info!(path = %base.display(), "loading configuration file");
                    return figment.merge(Toml::file(&base));
                }
            }
        }
        warn!("no configuration file found, using defaults");
        figment
    }

    #[cfg(not(feature = "toml-config"))]
    fn search_files(&self, figment: Figment) -> Figment {
        trace!(
            paths = self.resolve_search_paths().len(),
            "config files disabled, skipping search"
        );
        figment
    }
}

fn merge_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        #[cfg(feature = "toml-config")]
        "toml" => Ok(figment.merge(Toml::file(path))),
        _ => Err(ConfigError::ParseError(format!(
            "unsupported or disabled configuration file format: .{ext}"
        ))),
    }
}

/// Loads the configuration from the default locations.
pub fn load_config() -> ConfigResult<RivetConfig> {
    ConfigLoader::new().load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|jail| {
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config, RivetConfig::default());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env("RIVET_LOGGING__LEVEL", "debug");
            jail.set_env("RIVET_RULES__COMMAND_PREFIX", "#");
            jail.set_env("RIVET_RULES__SUPER_USERS", "[10001, 10002]");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.logging.level, LogLevel::Debug);
            assert_eq!(config.rules.command_prefix, "#");
            assert_eq!(config.rules.super_users, vec![10001, 10002]);
            Ok(())
        });
    }

    #[test]
    fn test_merge_sits_below_env() {
        Jail::expect_with(|jail| {
            jail.set_env("RIVET_RULES__WAIT_TIMEOUT_SECS", "30");
            let mut base = RivetConfig::default();
            base.rules.wait_timeout_secs = 60;
            base.rules.super_users = vec![7];

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .merge(base)
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.rules.wait_timeout_secs, 30);
            assert_eq!(config.rules.super_users, vec![7]);
            Ok(())
        });
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::new()
            .without_env()
            .file("does/not/exist.toml")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("prod"), Profile::Production);
        assert_eq!(Profile::parse("DEV"), Profile::Development);
        assert_eq!(Profile::parse("staging").as_str(), "staging");
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_toml_file_and_profile() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "rivet.toml",
                r#"
                [rules]
                super_users = [1, 2]
                command_prefix = "!"
                "#,
            )?;
            jail.create_file(
                "rivet.production.toml",
                r#"
                [logging]
                level = "warn"

                [rules]
                command_prefix = "."
                "#,
            )?;

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .profile("prod")
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.logging.level, LogLevel::Warn);
            // The base file is merged after the profile file.
            assert_eq!(config.rules.command_prefix, "!");
            assert_eq!(config.rules.super_users, vec![1, 2]);
            Ok(())
        });
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_explicit_file() {
        Jail::expect_with(|jail| {
            jail.create_file("bot.toml", "[rules]\nwait_timeout_secs = 45\n")?;
            let config = ConfigLoader::new()
                .file(jail.directory().join("bot.toml"))
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;
            assert_eq!(config.rules.wait_timeout_secs, 45);
            Ok(())
        });
    }
}
