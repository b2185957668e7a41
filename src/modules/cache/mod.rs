//! Cache module for region lookups
//!
//! Defines the cache backend contract and the in-process implementation
//! used by default.

mod backend;
mod memory;

pub use backend::{CacheBackend, CacheError};
pub use memory::MemoryCacheBackend;
