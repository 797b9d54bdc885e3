use std::path::PathBuf;
use tracing::warn;

use crate::auth::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::feed::OwnershipPolicy;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub json: bool,
    /// Directory for a daily-rolling log file; stderr only when unset
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub data_dir: PathBuf,
    pub bcrypt_cost: u32,
    pub ownership: OwnershipPolicy,
    pub log: LogConfig,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("feed_data"),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            ownership: OwnershipPolicy::default(),
            log: LogConfig::default(),
        }
    }
}

impl FeedConfig {
    /// Load from `FEED_*` variables, reading a `.env` file first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source. Bad values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("FEED_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("FEED_BCRYPT_COST") {
            match raw.trim().parse::<u32>() {
                Ok(cost) => config.bcrypt_cost = cost.clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST),
                Err(_) => warn!(value = %raw, "ignoring invalid FEED_BCRYPT_COST"),
            }
        }

        if let Some(raw) = lookup("FEED_OWNERSHIP") {
            match raw.parse::<OwnershipPolicy>() {
                Ok(policy) => config.ownership = policy,
                Err(_) => warn!(value = %raw, "ignoring invalid FEED_OWNERSHIP"),
            }
        }

        if let Some(raw) = lookup("FEED_LOG_JSON") {
            match raw.trim().parse::<bool>() {
                Ok(json) => config.log.json = json,
                Err(_) => warn!(value = %raw, "ignoring invalid FEED_LOG_JSON"),
            }
        }

        config.log.dir = lookup("FEED_LOG_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = FeedConfig::from_lookup(|_| None);
        assert_eq!(config, FeedConfig::default());
        assert_eq!(config.ownership, OwnershipPolicy::Author);
    }

    #[test]
    fn reads_all_variables() {
        let config = FeedConfig::from_lookup(lookup_from(&[
            ("FEED_DATA_DIR", "/tmp/feed"),
            ("FEED_BCRYPT_COST", "5"),
            ("FEED_OWNERSHIP", "open"),
            ("FEED_LOG_JSON", "true"),
            ("FEED_LOG_DIR", "/tmp/feed-logs"),
        ]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/feed"));
        assert_eq!(config.bcrypt_cost, 5);
        assert_eq!(config.ownership, OwnershipPolicy::Open);
        assert!(config.log.json);
        assert_eq!(config.log.dir, Some(PathBuf::from("/tmp/feed-logs")));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = FeedConfig::from_lookup(lookup_from(&[
            ("FEED_BCRYPT_COST", "cheap"),
            ("FEED_OWNERSHIP", "everyone"),
            ("FEED_LOG_JSON", "maybe"),
        ]));
        assert_eq!(config, FeedConfig::default());
    }

    #[test]
    fn bcrypt_cost_is_clamped() {
        let low = FeedConfig::from_lookup(lookup_from(&[("FEED_BCRYPT_COST", "1")]));
        assert_eq!(low.bcrypt_cost, MIN_BCRYPT_COST);
        let high = FeedConfig::from_lookup(lookup_from(&[("FEED_BCRYPT_COST", "99")]));
        assert_eq!(high.bcrypt_cost, MAX_BCRYPT_COST);
    }
}
