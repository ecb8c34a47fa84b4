//! Configuration module for Groot.
//!
//! Loads configuration from environment variables.

use std::env;

use thiserror::Error;

use crate::ratelimit::{parse_windows, InvalidWindow, RateLimitPolicy, RateWindow};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },

    #[error("{var}: {source}")]
    RateLimit {
        var: &'static str,
        #[source]
        source: InvalidWindow,
    },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,

    /// Owner user IDs (comma-separated).
    /// Owners bypass every gate check and may omit the prefix.
    pub owner_ids: Vec<u64>,

    // MongoDB
    pub mongodb_uri: String,
    pub mongodb_database: String,

    /// Prefix for chats that never configured one.
    pub default_prefix: String,
    /// Extra prefix accepted from owners.
    pub owner_prefix: String,

    /// Start in maintenance mode.
    pub maintenance: bool,

    pub rate_limit: RateLimitPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| {
            var(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let owner_ids = match var("OWNER_IDS") {
            Some(raw) => parse_owner_ids(&raw)?,
            None => Vec::new(),
        };

        let maintenance = match var("MAINTENANCE") {
            Some(raw) => parse_bool("MAINTENANCE", &raw)?,
            None => false,
        };

        let defaults = RateLimitPolicy::default();
        let rate_limit = RateLimitPolicy {
            standard: windows_or(var("RATE_LIMIT"), "RATE_LIMIT", defaults.standard)?,
            premium: windows_or(
                var("RATE_LIMIT_PREMIUM"),
                "RATE_LIMIT_PREMIUM",
                defaults.premium,
            )?,
        };

        Ok(Self {
            bot_token: required("BOT_TOKEN")?,
            owner_ids,
            mongodb_uri: required("MONGODB_URI")?,
            mongodb_database: var("MONGODB_DATABASE").unwrap_or_else(|| "groot".to_string()),
            default_prefix: var("DEFAULT_PREFIX").unwrap_or_else(|| "g.".to_string()),
            owner_prefix: var("OWNER_PREFIX").unwrap_or_else(|| "g.".to_string()),
            maintenance,
            rate_limit,
        })
    }
}

fn parse_owner_ids(raw: &str) -> Result<Vec<u64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>().map_err(|_| ConfigError::Invalid {
                var: "OWNER_IDS",
                value: s.to_string(),
            })
        })
        .collect()
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
        }),
    }
}

fn windows_or(
    raw: Option<String>,
    var: &'static str,
    default: Vec<RateWindow>,
) -> Result<Vec<RateWindow>, ConfigError> {
    match raw {
        Some(raw) => parse_windows(&raw).map_err(|source| ConfigError::RateLimit { var, source }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [("BOT_TOKEN", "123:abc"), ("MONGODB_URI", "mongodb://x")];

    #[test]
    fn test_defaults() {
        let config = load(&REQUIRED).unwrap();

        assert!(config.owner_ids.is_empty());
        assert_eq!(config.mongodb_database, "groot");
        assert_eq!(config.default_prefix, "g.");
        assert_eq!(config.owner_prefix, "g.");
        assert!(!config.maintenance);
        assert_eq!(config.rate_limit, RateLimitPolicy::default());
    }

    #[test]
    fn test_missing_token() {
        let err = load(&[("MONGODB_URI", "mongodb://x")]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("BOT_TOKEN")));
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("OWNER_IDS", "1, 2,"),
            ("MAINTENANCE", "on"),
            ("DEFAULT_PREFIX", "?"),
            ("RATE_LIMIT", "2/5"),
        ]);
        let config = load(&vars).unwrap();

        assert_eq!(config.owner_ids, vec![1, 2]);
        assert!(config.maintenance);
        assert_eq!(config.default_prefix, "?");
        assert_eq!(config.rate_limit.standard, vec![RateWindow::per_secs(2, 5)]);
        assert_eq!(config.rate_limit.premium, RateLimitPolicy::default().premium);
    }

    #[test]
    fn test_malformed_values_are_errors() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("OWNER_IDS", "1,abc"));
        assert!(matches!(load(&vars), Err(ConfigError::Invalid { .. })));

        let mut vars = REQUIRED.to_vec();
        vars.push(("RATE_LIMIT", "fast"));
        assert!(matches!(load(&vars), Err(ConfigError::RateLimit { .. })));
    }
}
