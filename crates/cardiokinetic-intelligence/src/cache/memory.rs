// ABOUTME: In-memory percentile store with LRU eviction
// ABOUTME: Shared through Arc<RwLock<LruCache>> so clones see the same entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use super::{PercentileCacheKey, PercentileStore};
use cardiokinetic_core::errors::AppResult;
use cardiokinetic_core::models::PercentileTable;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory percentile store
///
/// `LruCache` evicts the least recently used program once capacity is reached.
#[derive(Debug, Clone)]
pub struct InMemoryPercentileStore {
    store: Arc<RwLock<LruCache<PercentileCacheKey, Vec<PercentileTable>>>>,
}

impl Default for InMemoryPercentileStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY.get())
    }
}

impl InMemoryPercentileStore {
    /// Capacity used when zero is requested
    const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(64) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a store holding at most `capacity` programs
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        // LruCache requires NonZeroUsize for capacity
        let capacity = NonZeroUsize::new(capacity).unwrap_or(Self::DEFAULT_CAPACITY);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of stored programs
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether the store is empty
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    /// Remove every entry
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }
}

#[async_trait::async_trait]
impl PercentileStore for InMemoryPercentileStore {
    async fn get(&self, key: &PercentileCacheKey) -> AppResult<Option<Vec<PercentileTable>>> {
        // LruCache::get is mutable (updates access order for LRU)
        let tables = self.store.write().await.get(key).cloned();
        debug!(key = %key, hit = tables.is_some(), "Percentile store lookup");
        Ok(tables)
    }

    async fn put(&self, key: &PercentileCacheKey, tables: Vec<PercentileTable>) -> AppResult<()> {
        let evicted = self.store.write().await.push(key.clone(), tables);
        if let Some((evicted_key, _)) = evicted.filter(|(evicted_key, _)| evicted_key != key) {
            debug!(key = %evicted_key, "Evicted least recently used percentile tables");
        }
        Ok(())
    }

    async fn invalidate(&self, key: &PercentileCacheKey) -> AppResult<bool> {
        Ok(self.store.write().await.pop(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardiokinetic_core::models::PercentileSet;

    fn tables(weeks: u32) -> Vec<PercentileTable> {
        (1..=weeks)
            .map(|week| {
                let set = PercentileSet::new([10, 20, 30, 40, 50, 60]).unwrap();
                PercentileTable::new(week, set, set).unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_put_get_invalidate() {
        let store = InMemoryPercentileStore::new(4);
        let key = PercentileCacheKey::new("block", 3);
        assert!(store.get(&key).await.unwrap().is_none());

        store.put(&key, tables(3)).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap().map(|t| t.len()), Some(3));

        assert!(store.invalidate(&key).await.unwrap());
        assert!(!store.invalidate(&key).await.unwrap());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_evicts_least_recently_used() {
        let store = InMemoryPercentileStore::new(2);
        let first = PercentileCacheKey::new("a", 1);
        let second = PercentileCacheKey::new("b", 1);
        let third = PercentileCacheKey::new("c", 1);

        store.put(&first, tables(1)).await.unwrap();
        store.put(&second, tables(1)).await.unwrap();
        store.get(&first).await.unwrap();
        store.put(&third, tables(1)).await.unwrap();

        assert!(store.get(&first).await.unwrap().is_some());
        assert!(store.get(&second).await.unwrap().is_none());
        assert_eq!(store.len().await, 2);
    }
}
