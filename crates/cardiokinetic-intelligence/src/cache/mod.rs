// ABOUTME: Percentile table store abstraction keyed by template and program length
// ABOUTME: Callers supply the store explicitly; no global cache is kept by the engines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

/// In-memory LRU store
pub mod memory;

pub use memory::InMemoryPercentileStore;

use cardiokinetic_core::errors::AppResult;
use cardiokinetic_core::models::PercentileTable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the percentile tables of one resolved program length
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileCacheKey {
    /// Program template identifier
    pub template_id: String,
    /// Number of weeks the template was resolved to
    pub week_count: usize,
}

impl PercentileCacheKey {
    /// Create a key
    #[must_use]
    pub fn new(template_id: impl Into<String>, week_count: usize) -> Self {
        Self {
            template_id: template_id.into(),
            week_count,
        }
    }
}

impl fmt::Display for PercentileCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "percentiles:{}:{}w", self.template_id, self.week_count)
    }
}

/// Storage for simulated percentile tables
///
/// # Examples
///
/// ```rust,no_run
/// use cardiokinetic_intelligence::cache::{InMemoryPercentileStore, PercentileCacheKey, PercentileStore};
/// # async fn example() -> Result<(), cardiokinetic_core::errors::AppError> {
/// let store = InMemoryPercentileStore::new(16);
/// let key = PercentileCacheKey::new("linear-build", 12);
///
/// if store.get(&key).await?.is_none() {
///     store.put(&key, Vec::new()).await?;
/// }
/// store.invalidate(&key).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait PercentileStore: Send + Sync {
    /// Retrieve stored tables
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn get(&self, key: &PercentileCacheKey) -> AppResult<Option<Vec<PercentileTable>>>;

    /// Store tables, replacing any previous entry
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn put(&self, key: &PercentileCacheKey, tables: Vec<PercentileTable>) -> AppResult<()>;

    /// Remove an entry, returning whether one existed
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails
    async fn invalidate(&self, key: &PercentileCacheKey) -> AppResult<bool>;
}
