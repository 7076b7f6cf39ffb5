//! Configuration validation utilities.

use std::collections::HashSet;

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogFormat, LogOutput, LoggingConfig, RivetConfig, RulesConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &RivetConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_rules_config(&config.rules)?;
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if logging.format == LogFormat::Json && !cfg!(feature = "json-log") {
        return Err(ConfigError::validation(
            "JSON log format requires the `json-log` feature",
        ));
    }

    if logging.filters.keys().any(|module| module.trim().is_empty()) {
        return Err(ConfigError::validation("Log filter module cannot be empty"));
    }

    Ok(())
}

/// Validates rule layer settings.
fn validate_rules_config(rules: &RulesConfig) -> ConfigResult<()> {
    if rules.wait_timeout_secs == 0 {
        return Err(ConfigError::validation(
            "Wait timeout must be greater than 0",
        ));
    }

    if rules.command_prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation(
            "Command prefix cannot contain whitespace",
        ));
    }

    let mut seen = HashSet::new();
    for user in &rules.super_users {
        if !seen.insert(user) {
            return Err(ConfigError::DuplicateSuperUser(*user));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&RivetConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = RivetConfig::default();
        config.rules.wait_timeout_secs = 0;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_validate_duplicate_super_user() {
        let mut config = RivetConfig::default();
        config.rules.super_users = vec![1, 2, 1];
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::DuplicateSuperUser(1))
        ));
    }

    #[test]
    fn test_validate_prefix_whitespace() {
        let mut config = RivetConfig::default();
        config.rules.command_prefix = "/ ".into();
        assert!(validate_config(&config).is_err());

        // An empty prefix is allowed: commands then need no prefix at all.
        config.rules.command_prefix = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_file_output_requires_path() {
        let mut config = RivetConfig::default();
        config.logging.output = LogOutput::File;
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));

        config.logging.file_path = Some("rivet.log".into());
        assert!(validate_config(&config).is_ok());
    }
}
