use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

use crate::core::error::Result;
use crate::modules::cache::{CacheBackend, CacheError};
use crate::shared::constants::CACHE_KEY_DELIMITER;

/// Operation a cache key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePrefix {
    /// Children listings
    Regions,
    /// Single region by code
    Region,
    Hierarchy,
    Search,
    PostalCode,
    ValidateCode,
}

impl CachePrefix {
    pub const fn as_str(self) -> &'static str {
        match self {
            CachePrefix::Regions => "indonesia_regions",
            CachePrefix::Region => "region",
            CachePrefix::Hierarchy => "hierarchy",
            CachePrefix::Search => "search",
            CachePrefix::PostalCode => "postal_code",
            CachePrefix::ValidateCode => "validate_code",
        }
    }
}

/// Every key family ever issued, as backend delete patterns
pub const INVALIDATION_PATTERNS: [&str; 7] = [
    "indonesia_regions:*",
    "region:*",
    "regions:*",
    "hierarchy:*",
    "postal_code:*",
    "search:*",
    "validate_code:*",
];

/// `{prefix}:{identifier}[:{signature}]`
///
/// The signature is the last segment and never contains the delimiter, so
/// identifiers holding dots (region codes) or colons cannot make two keys meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(prefix: CachePrefix, identifier: &str) -> Self {
        Self([prefix.as_str(), identifier].join(CACHE_KEY_DELIMITER))
    }

    pub fn with_signature(prefix: CachePrefix, identifier: &str, signature: &str) -> Self {
        Self([prefix.as_str(), identifier, signature].join(CACHE_KEY_DELIMITER))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read-through cache over a [`CacheBackend`].
///
/// Backend failures never reach callers of [`RegionCache::remember`]: the
/// value is computed and returned uncached instead. Producer (store) errors
/// always propagate.
#[derive(Clone)]
pub struct RegionCache {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl RegionCache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    pub async fn remember<T, F, Fut>(&self, key: &CacheKey, producer: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.backend.get(key.as_str()).await {
            Ok(Some(cached)) => match serde_json::from_value::<T>(cached) {
                Ok(value) => {
                    tracing::debug!("Cache hit: {}", key);
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!("Discarding unreadable cache entry {}: {}", key, e);
                }
            },
            Ok(None) => {
                tracing::debug!("Cache miss: {}", key);
            }
            Err(e) => {
                tracing::warn!(
                    "Cache read failed for {}, querying store directly: {}",
                    key,
                    e
                );
                return producer().await;
            }
        }

        let value = producer().await?;
        if let Err(e) = self.store(key, &value).await {
            tracing::warn!("Cache write failed for {}: {}", key, e);
        }
        Ok(value)
    }

    async fn store<T: Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
    ) -> std::result::Result<(), CacheError> {
        let value = serde_json::to_value(value)?;
        self.backend.set(key.as_str(), value, self.ttl).await
    }

    /// Invalidate every region cache entry.
    ///
    /// Deletes each key family by pattern; if any pattern could not be
    /// deleted, falls back to flushing the whole store. Returns `false` only
    /// when both passes failed.
    pub async fn clear_all(&self) -> bool {
        let mut patterns_cleared = true;

        for pattern in INVALIDATION_PATTERNS {
            match self.backend.delete_matching(pattern).await {
                Ok(true) => {}
                Ok(false) => {
                    tracing::debug!("Pattern deletion not carried out for '{}'", pattern);
                    patterns_cleared = false;
                }
                Err(e) => {
                    tracing::warn!("Failed to delete cache pattern '{}': {}", pattern, e);
                    patterns_cleared = false;
                }
            }
        }

        if patterns_cleared {
            tracing::info!("Region cache cleared");
            return true;
        }

        match self.backend.flush().await {
            Ok(true) => {
                tracing::info!("Region cache cleared by full flush");
                true
            }
            Ok(false) => {
                tracing::error!("Failed to clear region cache: flush not carried out");
                false
            }
            Err(e) => {
                tracing::error!("Failed to clear region cache: {}", e);
                false
            }
        }
    }
}
