// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! LRU cache for downloaded credential documents.
//!
//! Documents are keyed by their content identifier, which addresses the
//! bytes themselves, so a cached document never goes stale. On-chain fields
//! such as `isVerified` are not cached. Entries expire after a TTL and the
//! whole cache is dropped when the wallet session resets.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde_json::Value;

struct CacheEntry {
    document: Value,
    inserted_at: Instant,
}

pub struct VerificationCache {
    cache: Mutex<LruCache<String, CacheEntry>>,
    ttl: Duration,
}

impl VerificationCache {
    /// `capacity` is clamped to at least one entry.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
            ttl,
        }
    }

    /// Cached document stored under `content_id`, or `None` if absent or expired.
    pub fn get(&self, content_id: &str) -> Option<Value> {
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(content_id) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.document.clone());
            }
            cache.pop(content_id);
        }
        None
    }

    pub fn put(&self, content_id: &str, document: Value) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                content_id.to_string(),
                CacheEntry {
                    document,
                    inserted_at: Instant::now(),
                },
            );
        }
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cid(n: u64) -> String {
        format!("sha256-{n}")
    }

    fn document(n: u64) -> Value {
        json!({ "credentialType": "degree", "n": n })
    }

    #[test]
    fn put_and_get() {
        let cache = VerificationCache::new(10, Duration::from_secs(300));
        assert!(cache.get(&cid(1)).is_none());

        cache.put(&cid(1), document(1));
        assert_eq!(cache.get(&cid(1)), Some(document(1)));
    }

    #[test]
    fn ttl_expiry() {
        let cache = VerificationCache::new(10, Duration::from_millis(1));
        cache.put(&cid(1), document(1));

        std::thread::sleep(Duration::from_millis(5));

        assert!(cache.get(&cid(1)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn lru_eviction() {
        let cache = VerificationCache::new(2, Duration::from_secs(300));
        cache.put(&cid(1), document(1));
        cache.put(&cid(2), document(2));
        cache.get(&cid(1));
        cache.put(&cid(3), document(3));

        assert!(cache.get(&cid(1)).is_some());
        assert!(cache.get(&cid(2)).is_none());
        assert!(cache.get(&cid(3)).is_some());
    }

    #[test]
    fn zero_capacity_holds_one_entry() {
        let cache = VerificationCache::new(0, Duration::from_secs(300));
        cache.put(&cid(1), document(1));
        cache.put(&cid(2), document(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_drops_everything() {
        let cache = VerificationCache::new(10, Duration::from_secs(300));
        cache.put(&cid(1), document(1));
        cache.put(&cid(2), document(2));
        cache.clear();
        assert!(cache.is_empty());
    }
}
