use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// Key/value cache store with TTL and pattern invalidation
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheError>;

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CacheError>;

    /// Delete every key matching `pattern` (a literal prefix followed by `*`,
    /// or an exact key). Returns whether the deletion was carried out.
    async fn delete_matching(&self, pattern: &str) -> Result<bool, CacheError>;

    /// Drop every entry in the store
    async fn flush(&self) -> Result<bool, CacheError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("Unsupported cache operation: {0}")]
    Unsupported(String),

    #[error("Cache serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::Serialization(e.to_string())
    }
}
