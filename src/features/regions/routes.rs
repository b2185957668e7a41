use std::sync::Arc;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::features::regions::handlers;
use crate::features::regions::services::RegionService;

/// Create routes for the regions feature
pub fn routes(service: Arc<RegionService>) -> Router {
    Router::new()
        .route("/api/regions", get(handlers::list_regions))
        // Static segments take priority over {code}
        .route("/api/regions/select", get(handlers::list_region_options))
        .route("/api/regions/search", get(handlers::search_regions))
        .route("/api/regions/cache", delete(handlers::clear_region_cache))
        .route(
            "/api/regions/postal-codes/{postal_code}",
            get(handlers::get_region_by_postal_code),
        )
        .route("/api/regions/{code}", get(handlers::get_region))
        .route("/api/regions/{code}/info", get(handlers::get_region_info))
        .route(
            "/api/regions/{code}/address",
            get(handlers::get_region_address),
        )
        .route(
            "/api/regions/{code}/validate",
            get(handlers::validate_region_code),
        )
        .with_state(service)
}
