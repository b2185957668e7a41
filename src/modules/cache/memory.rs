//! In-process cache backend
//!
//! Entries live in a bounded `moka` cache: once `max_entries` is reached the
//! least valuable entries are evicted to make room, so writes are never
//! refused. Each entry carries its own expiry and is dropped lazily the next
//! time it is read. Pattern deletion registers an invalidation predicate over
//! the store's own key set, so no external key index is required.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use serde_json::Value;

use super::backend::{CacheBackend, CacheError};

#[derive(Clone)]
struct CacheEntry {
    value: Value,
    /// `None` when the TTL reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: Value, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: now.checked_add(ttl),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

pub struct MemoryCacheBackend {
    entries: Cache<String, CacheEntry>,
}

impl MemoryCacheBackend {
    pub fn new(max_entries: Option<usize>) -> Self {
        let builder = Cache::builder().support_invalidation_closures();
        let entries = match max_entries {
            Some(max_entries) => builder.max_capacity(max_entries as u64).build(),
            None => builder.build(),
        };
        Self { entries }
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> u64 {
        self.entries.run_pending_tasks().await;
        self.entries.entry_count()
    }
}

impl Default for MemoryCacheBackend {
    fn default() -> Self {
        Self::new(None)
    }
}

/// `prefix*` matches by prefix, anything else is an exact key
fn key_matches(pattern: &str, key: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == pattern,
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError> {
        let Some(entry) = self.entries.get(key).await else {
            return Ok(None);
        };

        if entry.is_expired(Instant::now()) {
            self.entries.invalidate(key).await;
            return Ok(None);
        }
        Ok(Some(entry.value))
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CacheError> {
        let entry = CacheEntry::new(value, ttl, Instant::now());
        self.entries.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete_matching(&self, pattern: &str) -> Result<bool, CacheError> {
        let owned = pattern.to_string();
        self.entries
            .invalidate_entries_if(move |key, _| key_matches(&owned, key))
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        tracing::debug!("Invalidated cache entries matching '{}'", pattern);
        Ok(true)
    }

    async fn flush(&self) -> Result<bool, CacheError> {
        self.entries.invalidate_all();
        Ok(true)
    }
}
