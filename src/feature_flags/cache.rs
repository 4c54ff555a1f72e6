use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use super::store::{FeatureFlag, FlagOverride};

pub const DEFAULT_FLAG_TTL: Duration = Duration::from_secs(300);

/// Entries kept per map before the least recently used one is evicted.
pub const DEFAULT_FLAG_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: now + ttl,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Two bounded, expiring maps: flags by name and overrides by (flag, user).
///
/// Lookups that found nothing are cached too, so a missing flag doesn't hit
/// the store on every render. Owned by whoever builds the service; not shared.
#[derive(Debug)]
pub struct FeatureFlagCache {
    ttl: Duration,
    flags: LruCache<String, CacheEntry<Option<FeatureFlag>>>,
    overrides: LruCache<(String, String), CacheEntry<Option<FlagOverride>>>,
}

impl Default for FeatureFlagCache {
    fn default() -> Self {
        Self::new(DEFAULT_FLAG_TTL)
    }
}

impl FeatureFlagCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, DEFAULT_FLAG_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, capacity: NonZeroUsize) -> Self {
        Self {
            ttl,
            flags: LruCache::new(capacity),
            overrides: LruCache::new(capacity),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// `None` on a miss or expired entry; `Some(None)` when the store had no such flag.
    pub fn get_flag(&mut self, name: &str) -> Option<Option<FeatureFlag>> {
        self.get_flag_at(name, Instant::now())
    }

    pub fn put_flag(&mut self, name: &str, flag: Option<FeatureFlag>) {
        self.put_flag_at(name, flag, Instant::now());
    }

    pub fn get_override(&mut self, flag_name: &str, user_id: &str) -> Option<Option<FlagOverride>> {
        self.get_override_at(flag_name, user_id, Instant::now())
    }

    pub fn put_override(&mut self, flag_name: &str, user_id: &str, value: Option<FlagOverride>) {
        self.put_override_at(flag_name, user_id, value, Instant::now());
    }

    pub fn clear(&mut self) {
        self.flags.clear();
        self.overrides.clear();
    }

    pub fn len(&self) -> usize {
        self.flags.len() + self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn get_flag_at(&mut self, name: &str, now: Instant) -> Option<Option<FeatureFlag>> {
        if self.flags.peek(name)?.is_expired(now) {
            self.flags.pop(name);
            return None;
        }
        self.flags.get(name).map(|entry| entry.value.clone())
    }

    pub(crate) fn put_flag_at(&mut self, name: &str, flag: Option<FeatureFlag>, now: Instant) {
        self.flags
            .put(name.to_string(), CacheEntry::new(flag, self.ttl, now));
    }

    pub(crate) fn get_override_at(
        &mut self,
        flag_name: &str,
        user_id: &str,
        now: Instant,
    ) -> Option<Option<FlagOverride>> {
        let key = (flag_name.to_string(), user_id.to_string());
        if self.overrides.peek(&key)?.is_expired(now) {
            self.overrides.pop(&key);
            return None;
        }
        self.overrides.get(&key).map(|entry| entry.value.clone())
    }

    pub(crate) fn put_override_at(
        &mut self,
        flag_name: &str,
        user_id: &str,
        value: Option<FlagOverride>,
        now: Instant,
    ) {
        self.overrides.put(
            (flag_name.to_string(), user_id.to_string()),
            CacheEntry::new(value, self.ttl, now),
        );
    }
}
