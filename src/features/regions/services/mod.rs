pub mod query_builder;
pub mod region_cache;
mod region_service;

pub use region_cache::RegionCache;
pub use region_service::RegionService;
