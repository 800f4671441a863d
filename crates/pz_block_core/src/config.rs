//! Runtime configuration resolved from the process environment.
//!
//! # Responsibility
//! - Resolve block store path and logging settings from `PZ_BLOCK_*`
//!   environment variables.
//!
//! # Invariants
//! - Blank values behave as if the variable were unset.
//! - Resolution never fails; unset values fall back to defaults.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "PZ_BLOCK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PZ_BLOCK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PZ_BLOCK_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "pz_block.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite database file backing `pz_block`.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`; validated by `init_logging`.
    pub log_level: String,
    /// Rolling log directory. File logging is off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: non_blank(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: non_blank(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: non_blank(ENV_LOG_DIR).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, AppConfig::default());
        assert!(config.db_path.ends_with("pz_block.sqlite3"));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = AppConfig::from_lookup(lookup_from(&[(ENV_DB_PATH, "  "), (ENV_LOG_DIR, "")]));
        assert_eq!(config.db_path, AppConfig::default().db_path);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_are_trimmed_and_used() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, " /srv/admin/blocks.db "),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "/var/log/pz_block"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/srv/admin/blocks.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/pz_block")));
    }
}
