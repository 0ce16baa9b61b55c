//! Small in-process TTL cache — `key → { value, expires_at }`.
//!
//! Replaces the ad-hoc "plain object plus manual millisecond expiry check"
//! pattern with one abstraction shared by the insights endpoints. Expired
//! entries are treated as absent and dropped on read.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Thread-safe TTL cache. Values are cloned out on read, so `V` is expected
/// to be a cheap-to-clone response object (`Arc` it if that stops being true).
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the cached value for `key` if present and not expired.
    /// A hit on an expired entry removes it and reports a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_get_returns_inserted_value_before_expiry() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("rust".to_string(), 7);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get(&"rust".to_string()), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_a_miss_and_is_dropped() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("rust".to_string(), 7);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get(&"rust".to_string()), None);
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_insert_replaces_previous_entry() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("rust".to_string(), 1);
        cache.insert("rust".to_string(), 2);

        assert_eq!(cache.get(&"rust".to_string()), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reinsert_after_expiry_refreshes_ttl() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("go".to_string(), 1);

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get(&"go".to_string()), None);

        cache.insert("go".to_string(), 2);
        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.get(&"go".to_string()), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1);

        tokio::time::advance(Duration::from_secs(40)).await;
        cache.insert("b".to_string(), 2);

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(cache.get(&"a".to_string()), None); // 70s old
        assert_eq!(cache.get(&"b".to_string()), Some(2)); // 30s old
    }
}
