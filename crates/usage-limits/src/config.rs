//! Usage configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, UsageError};
use crate::DEFAULT_USAGE_LIMIT;

/// Environment variable holding the default usage limit
pub const DEFAULT_LIMIT_ENV: &str = "USAGE_DEFAULT_LIMIT";

/// Defaults applied when building limiters from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Uses granted to a limiter built with
    /// [`UsageLimiter::from_config`](crate::UsageLimiter::from_config)
    pub default_limit: u64,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_USAGE_LIMIT,
        }
    }
}

impl UsageConfig {
    /// Load configuration from the environment and an optional `.env` file
    pub fn load() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(err) if err.not_found() => {}
            Err(err) => return Err(err.into()),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(DEFAULT_LIMIT_ENV) {
            cfg.default_limit = parse_limit(&raw)?;
        }

        Ok(cfg)
    }
}

/// Parse a usage limit, rejecting negative and non-numeric input
pub fn parse_limit(raw: &str) -> Result<u64> {
    let trimmed = raw.trim();
    if let Ok(limit) = trimmed.parse::<u64>() {
        return Ok(limit);
    }

    if trimmed.parse::<i64>().is_ok() {
        return Err(UsageError::invalid(format!(
            "usage limit must be non-negative, got {trimmed}"
        )));
    }
    Err(UsageError::invalid(format!(
        "usage limit must be a number, got {raw:?}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = UsageConfig::default();
        assert_eq!(cfg.default_limit, 1);
    }

    #[test]
    fn test_parse_limit() {
        assert_eq!(parse_limit("3").unwrap(), 3);
        assert_eq!(parse_limit(" 0 ").unwrap(), 0);
        assert!(matches!(parse_limit("-1"), Err(UsageError::InvalidArgument(_))));
        assert!(matches!(parse_limit("abc"), Err(UsageError::InvalidArgument(_))));
        assert!(matches!(parse_limit("2.5"), Err(UsageError::InvalidArgument(_))));
    }

    #[test]
    fn test_from_lookup() {
        let cfg = UsageConfig::from_lookup(|key| {
            (key == DEFAULT_LIMIT_ENV).then(|| "7".to_string())
        })
        .unwrap();
        assert_eq!(cfg.default_limit, 7);

        let unset = UsageConfig::from_lookup(|_| None).unwrap();
        assert_eq!(unset, UsageConfig::default());

        let bad = UsageConfig::from_lookup(|_| Some("-4".to_string()));
        assert!(bad.is_err());
    }
}
