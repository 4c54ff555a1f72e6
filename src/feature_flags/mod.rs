pub mod cache;
pub mod error;
pub mod store;

pub use cache::{FeatureFlagCache, DEFAULT_FLAG_CAPACITY, DEFAULT_FLAG_TTL};
pub use error::FeatureFlagError;
pub use store::{FeatureFlag, FeatureFlagStore, FlagOverride, StaticFlagStore};

use std::time::Duration;
use tracing::debug;

/// Switches the default shopping list view to aisle grouping.
pub const AISLE_GROUPING_FLAG: &str = "shopping_list_aisle_grouping";

/// Resolves feature flags through a TTL cache in front of a store.
///
/// Built once at startup and passed to whatever needs flag checks.
pub struct FeatureFlagService<S: FeatureFlagStore> {
    store: S,
    cache: FeatureFlagCache,
}

impl<S: FeatureFlagStore> FeatureFlagService<S> {
    pub fn new(store: S, ttl: Duration) -> Self {
        Self::with_cache(store, FeatureFlagCache::new(ttl))
    }

    pub fn with_cache(store: S, cache: FeatureFlagCache) -> Self {
        Self { store, cache }
    }

    /// A user override wins over the flag's global value; unknown flags are off.
    pub fn is_enabled(&mut self, flag_name: &str, user_id: Option<&str>) -> Result<bool, FeatureFlagError> {
        if let Some(user_id) = user_id {
            if let Some(user_override) = self.user_override(flag_name, user_id)? {
                debug!(flag = flag_name, user_id, enabled = user_override.enabled, "feature flag override");
                return Ok(user_override.enabled);
            }
        }
        Ok(self.flag(flag_name)?.is_some_and(|f| f.enabled))
    }

    pub fn flag(&mut self, flag_name: &str) -> Result<Option<FeatureFlag>, FeatureFlagError> {
        if let Some(cached) = self.cache.get_flag(flag_name) {
            return Ok(cached);
        }
        let fetched = self.store.fetch_flag(flag_name)?;
        self.cache.put_flag(flag_name, fetched.clone());
        Ok(fetched)
    }

    pub fn user_override(
        &mut self,
        flag_name: &str,
        user_id: &str,
    ) -> Result<Option<FlagOverride>, FeatureFlagError> {
        if let Some(cached) = self.cache.get_override(flag_name, user_id) {
            return Ok(cached);
        }
        let fetched = self.store.fetch_override(flag_name, user_id)?;
        self.cache.put_override(flag_name, user_id, fetched.clone());
        Ok(fetched)
    }

    /// Drops every cached value, e.g. after flags were edited.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }
}
