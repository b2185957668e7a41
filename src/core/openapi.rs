use utoipa::{Modify, OpenApi};

use crate::features::regions::{dtos as regions_dtos, handlers as regions_handlers, models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Listing
        regions_handlers::list_regions,
        regions_handlers::list_region_options,
        // Search
        regions_handlers::search_regions,
        // Lookups
        regions_handlers::get_region_by_postal_code,
        regions_handlers::get_region,
        regions_handlers::get_region_info,
        regions_handlers::get_region_address,
        regions_handlers::validate_region_code,
        // Cache
        regions_handlers::clear_region_cache,
    ),
    components(
        schemas(
            Meta,
            models::RegionType,
            regions_dtos::RegionResponseDto,
            regions_dtos::RegionSearchResponseDto,
            regions_dtos::RegionInfoResponseDto,
            regions_dtos::RegionOptionsResponseDto,
            regions_dtos::RegionAddressResponseDto,
            regions_dtos::CodeValidationResponseDto,
            regions_dtos::CacheClearResponseDto,
            ApiResponse<Vec<regions_dtos::RegionResponseDto>>,
            ApiResponse<regions_dtos::RegionResponseDto>,
            ApiResponse<Vec<regions_dtos::RegionSearchResponseDto>>,
            ApiResponse<regions_dtos::RegionInfoResponseDto>,
            ApiResponse<regions_dtos::RegionOptionsResponseDto>,
            ApiResponse<regions_dtos::RegionAddressResponseDto>,
            ApiResponse<regions_dtos::CodeValidationResponseDto>,
            ApiResponse<regions_dtos::CacheClearResponseDto>,
        )
    ),
    tags(
        (name = "regions", description = "Indonesian administrative regions (provinces, cities, districts, villages)"),
    ),
    info(
        title = "Balungpisah Wilayah API",
        version = "0.1.0",
        description = "Lookup and search over Indonesian administrative regions",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_region_routes() {
        let mut openapi = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Wilayah".to_string(),
            version: "1.2.3".to_string(),
            description: "Test".to_string(),
        }
        .modify(&mut openapi);

        assert_eq!(openapi.info.title, "Wilayah");
        assert_eq!(openapi.info.version, "1.2.3");

        let paths = &openapi.paths.paths;
        for path in [
            "/api/regions",
            "/api/regions/select",
            "/api/regions/search",
            "/api/regions/postal-codes/{postal_code}",
            "/api/regions/{code}",
            "/api/regions/{code}/info",
            "/api/regions/{code}/address",
            "/api/regions/{code}/validate",
            "/api/regions/cache",
        ] {
            assert!(paths.contains_key(path), "{} is not documented", path);
        }
    }
}
