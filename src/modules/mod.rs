//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for infrastructure the features depend on, such as the cache store.

pub mod cache;
