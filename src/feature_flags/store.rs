use serde::{Deserialize, Serialize};

use super::error::FeatureFlagError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FeatureFlag {
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// Per-user value for a flag, taking precedence over the flag's global value.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FlagOverride {
    pub flag_name: String,
    pub user_id: String,
    pub enabled: bool,
}

/// Where flags come from (the backend's flag tables in production).
pub trait FeatureFlagStore {
    fn fetch_flag(&self, name: &str) -> Result<Option<FeatureFlag>, FeatureFlagError>;

    fn fetch_override(
        &self,
        flag_name: &str,
        user_id: &str,
    ) -> Result<Option<FlagOverride>, FeatureFlagError>;
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct StaticFlagStore {
    #[serde(default)]
    pub flags: Vec<FeatureFlag>,
    #[serde(default)]
    pub overrides: Vec<FlagOverride>,
}

impl StaticFlagStore {
    pub fn new(flags: Vec<FeatureFlag>, overrides: Vec<FlagOverride>) -> Self {
        Self { flags, overrides }
    }

    /// Parses `{ "flags": [...], "overrides": [...] }`.
    pub fn from_json(content: &str) -> Result<Self, FeatureFlagError> {
        Ok(serde_json::from_str(content)?)
    }
}

impl FeatureFlagStore for StaticFlagStore {
    fn fetch_flag(&self, name: &str) -> Result<Option<FeatureFlag>, FeatureFlagError> {
        Ok(self.flags.iter().find(|f| f.name == name).cloned())
    }

    fn fetch_override(
        &self,
        flag_name: &str,
        user_id: &str,
    ) -> Result<Option<FlagOverride>, FeatureFlagError> {
        Ok(self
            .overrides
            .iter()
            .find(|o| o.flag_name == flag_name && o.user_id == user_id)
            .cloned())
    }
}
