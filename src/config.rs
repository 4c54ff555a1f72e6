use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::feature_flags::DEFAULT_FLAG_TTL;
use crate::shopping::GroupMode;

pub const GROUP_BY_ENV_VAR: &str = "SHOPPING_LIST_GROUP_BY";
pub const FLAG_TTL_ENV_VAR: &str = "FEATURE_FLAG_TTL_SECS";
pub const ITEMS_FILE_ENV_VAR: &str = "SHOPPING_LIST_ITEMS_FILE";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub group_mode: GroupMode,
    pub feature_flag_ttl: Duration,
    pub items_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            group_mode: GroupMode::default(),
            feature_flag_ttl: DEFAULT_FLAG_TTL,
            items_file: None,
        }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; bad values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let group_mode = match lookup(GROUP_BY_ENV_VAR) {
            Some(raw) => raw.parse::<GroupMode>().unwrap_or_else(|e| {
                warn!("{}: {}; using '{}'", GROUP_BY_ENV_VAR, e, defaults.group_mode);
                defaults.group_mode
            }),
            None => defaults.group_mode,
        };

        let feature_flag_ttl = match lookup(FLAG_TTL_ENV_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) => Duration::from_secs(secs),
                Err(_) => {
                    warn!(
                        "{} is not a whole number of seconds ('{}'); using {}s",
                        FLAG_TTL_ENV_VAR,
                        raw,
                        defaults.feature_flag_ttl.as_secs()
                    );
                    defaults.feature_flag_ttl
                }
            },
            None => defaults.feature_flag_ttl,
        };

        let items_file = lookup(ITEMS_FILE_ENV_VAR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Self {
            group_mode,
            feature_flag_ttl,
            items_file,
        }
    }
}
