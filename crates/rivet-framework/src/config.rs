//! Read-only configuration consumed by the command and permission rules.

use serde::{Deserialize, Serialize};

/// Settings passed into rule constructors.
///
/// Rules capture what they need when they are built, so changing a
/// `RuleConfig` afterwards does not affect rules that already exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Bot owners, in precedence order.
    pub super_users: Vec<i64>,
    /// Literal that must precede every command name.
    pub command_prefix: String,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            super_users: Vec::new(),
            command_prefix: "/".to_string(),
        }
    }
}

impl RuleConfig {
    /// Creates a config with the given super users and command prefix.
    pub fn new(super_users: impl IntoIterator<Item = i64>, command_prefix: impl Into<String>) -> Self {
        Self {
            super_users: super_users.into_iter().collect(),
            command_prefix: command_prefix.into(),
        }
    }

    /// Returns `true` if `user_id` is a configured super user.
    pub fn is_super_user(&self, user_id: i64) -> bool {
        self.super_users.contains(&user_id)
    }

    /// Returns whichever of `candidates` appears first in the super user list.
    pub fn first_super_user(&self, candidates: &[i64]) -> Option<i64> {
        self.super_users
            .iter()
            .copied()
            .find(|su| candidates.contains(su))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_super_user_follows_config_order() {
        let config = RuleConfig::new([30, 10, 20], "/");
        assert_eq!(config.first_super_user(&[10, 20]), Some(10));
        assert_eq!(config.first_super_user(&[20, 30]), Some(30));
        assert_eq!(config.first_super_user(&[40]), None);
        assert!(config.is_super_user(20));
        assert!(!config.is_super_user(40));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: RuleConfig = serde_json::from_str(r#"{"super_users":[1]}"#).unwrap();
        assert_eq!(config.super_users, vec![1]);
        assert_eq!(config.command_prefix, "/");
    }
}
