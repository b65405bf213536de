/// In-memory cache layer for aggregated data
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// A cached value and the time it was fetched
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now - self.fetched_at < ttl,
            Err(_) => true,
        }
    }
}

/// Single-slot cache
pub struct CacheRepo<T> {
    name: &'static str,
    ttl: Duration,
    slot: RwLock<Option<CacheEntry<T>>>,
}

impl<T: Clone> CacheRepo<T> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// Cached value while younger than the TTL
    pub async fn get_fresh(&self, now: DateTime<Utc>) -> Option<T> {
        let slot = self.slot.read().await;
        let entry = slot.as_ref().filter(|e| e.is_fresh(now, self.ttl))?;
        debug!("{} cache hit (fetched at {})", self.name, entry.fetched_at);
        Some(entry.data.clone())
    }

    /// Overwrite the slot; concurrent writers race and the last one wins
    pub async fn write(&self, data: T, now: DateTime<Utc>) {
        *self.slot.write().await = Some(CacheEntry {
            data,
            fetched_at: now,
        });
    }
}

/// Cache with one slot per key
pub struct KeyedCacheRepo<T> {
    name: &'static str,
    ttl: Duration,
    slots: RwLock<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> KeyedCacheRepo<T> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get_fresh(&self, key: &str, now: DateTime<Utc>) -> Option<T> {
        let slots = self.slots.read().await;
        let entry = slots.get(key).filter(|e| e.is_fresh(now, self.ttl))?;
        debug!("{} cache hit for {}", self.name, key);
        Some(entry.data.clone())
    }

    pub async fn write(&self, key: &str, data: T, now: DateTime<Utc>) {
        self.slots.write().await.insert(
            key.to_string(),
            CacheEntry {
                data,
                fetched_at: now,
            },
        );
    }
}
