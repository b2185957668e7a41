use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::regions::dtos::{
    CacheClearResponseDto, CodeValidationResponseDto, ColumnsQuery, RegionAddressResponseDto,
    RegionInfoResponseDto, RegionListQuery, RegionOptionsResponseDto, RegionResponseDto,
    RegionSearchQuery, RegionSearchResponseDto, RegionSelectQuery,
};
use crate::features::regions::models::parent_code;
use crate::features::regions::services::RegionService;
use crate::shared::types::{ApiResponse, Meta};

// ==================== Listing Handlers ====================

/// List the direct children of a region (provinces when no parent is given)
#[utoipa::path(
    get,
    path = "/api/regions",
    params(RegionListQuery),
    responses(
        (status = 200, description = "Child regions ordered by name", body = ApiResponse<Vec<RegionResponseDto>>),
        (status = 400, description = "Unknown column or malformed parameters")
    ),
    tag = "regions"
)]
pub async fn list_regions(
    State(service): State<Arc<RegionService>>,
    AppQuery(query): AppQuery<RegionListQuery>,
) -> Result<Json<ApiResponse<Vec<RegionResponseDto>>>> {
    let selection = query.selection()?;
    let listing = service
        .get_regions(query.parent_code.as_deref(), &selection, query.page_request())
        .await?;

    let (regions, meta) = listing.map(RegionResponseDto::from).into_parts();
    Ok(Json(ApiResponse::success(Some(regions), None, Some(meta))))
}

/// Child regions as a code → name map
#[utoipa::path(
    get,
    path = "/api/regions/select",
    params(RegionSelectQuery),
    responses(
        (status = 200, description = "Options keyed by region code", body = ApiResponse<RegionOptionsResponseDto>)
    ),
    tag = "regions"
)]
pub async fn list_region_options(
    State(service): State<Arc<RegionService>>,
    AppQuery(query): AppQuery<RegionSelectQuery>,
) -> Result<Json<ApiResponse<RegionOptionsResponseDto>>> {
    let options = service
        .get_for_select(query.parent_code.as_deref())
        .await?;
    let meta = Meta::total(options.len() as i64);
    Ok(Json(ApiResponse::success(
        Some(RegionOptionsResponseDto { options }),
        None,
        Some(meta),
    )))
}

// ==================== Search Handlers ====================

/// Search regions by name, or villages by postal code
#[utoipa::path(
    get,
    path = "/api/regions/search",
    params(RegionSearchQuery),
    responses(
        (status = 200, description = "Matching regions ordered by code", body = ApiResponse<Vec<RegionSearchResponseDto>>),
        (status = 400, description = "Missing search term, unknown type or unknown column")
    ),
    tag = "regions"
)]
pub async fn search_regions(
    State(service): State<Arc<RegionService>>,
    AppQuery(query): AppQuery<RegionSearchQuery>,
) -> Result<Json<ApiResponse<Vec<RegionSearchResponseDto>>>> {
    query.validate()?;
    let term = query.term()?;
    let level = query.level()?;
    let selection = query.selection()?;
    let page = query.page_request();

    let listing = if query.with_address {
        service
            .search_with_address(term, level, page, &selection)
            .await?
            .map(RegionSearchResponseDto::from)
    } else {
        service
            .search(term, level, page, &selection)
            .await?
            .map(RegionSearchResponseDto::from)
    };

    let (hits, meta) = listing.into_parts();
    Ok(Json(ApiResponse::success(Some(hits), None, Some(meta))))
}

// ==================== Lookup Handlers ====================

/// Get the region carrying a postal code
#[utoipa::path(
    get,
    path = "/api/regions/postal-codes/{postal_code}",
    params(
        ("postal_code" = String, Path, description = "Five digit postal code")
    ),
    responses(
        (status = 200, description = "Region details", body = ApiResponse<RegionResponseDto>),
        (status = 404, description = "No region with this postal code")
    ),
    tag = "regions"
)]
pub async fn get_region_by_postal_code(
    State(service): State<Arc<RegionService>>,
    Path(postal_code): Path<String>,
) -> Result<Json<ApiResponse<RegionResponseDto>>> {
    let region = service
        .find_by_postal_code(&postal_code)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No region with postal code {}", postal_code))
        })?;

    Ok(Json(ApiResponse::success(Some(region.into()), None, None)))
}

/// Get a region by code
#[utoipa::path(
    get,
    path = "/api/regions/{code}",
    params(
        ("code" = String, Path, description = "Region code (XX, XX.XX, XX.XX.XX or XX.XX.XX.XXXX)"),
        ColumnsQuery
    ),
    responses(
        (status = 200, description = "Region details", body = ApiResponse<RegionResponseDto>),
        (status = 400, description = "Unknown column"),
        (status = 404, description = "Region not found")
    ),
    tag = "regions"
)]
pub async fn get_region(
    State(service): State<Arc<RegionService>>,
    Path(code): Path<String>,
    AppQuery(query): AppQuery<ColumnsQuery>,
) -> Result<Json<ApiResponse<RegionResponseDto>>> {
    let selection = query.selection()?;
    let region = service
        .find_by_code(&code, &selection)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Region {} not found", code)))?;

    Ok(Json(ApiResponse::success(Some(region.into()), None, None)))
}

/// Get a region together with its ancestors and full address
#[utoipa::path(
    get,
    path = "/api/regions/{code}/info",
    params(
        ("code" = String, Path, description = "Region code at any level"),
        ColumnsQuery
    ),
    responses(
        (status = 200, description = "Region hierarchy; empty when the province is unknown", body = ApiResponse<RegionInfoResponseDto>),
        (status = 400, description = "Unknown column")
    ),
    tag = "regions"
)]
pub async fn get_region_info(
    State(service): State<Arc<RegionService>>,
    Path(code): Path<String>,
    AppQuery(query): AppQuery<ColumnsQuery>,
) -> Result<Json<ApiResponse<RegionInfoResponseDto>>> {
    let selection = query.selection()?;
    let info = service.get_region_info(&code, &selection).await?;
    Ok(Json(ApiResponse::success(Some(info.into()), None, None)))
}

/// Get the full address of a region
#[utoipa::path(
    get,
    path = "/api/regions/{code}/address",
    params(
        ("code" = String, Path, description = "Region code at any level")
    ),
    responses(
        (status = 200, description = "Composed address", body = ApiResponse<RegionAddressResponseDto>),
        (status = 404, description = "Region hierarchy cannot be resolved")
    ),
    tag = "regions"
)]
pub async fn get_region_address(
    State(service): State<Arc<RegionService>>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<RegionAddressResponseDto>>> {
    let full_address = service
        .get_full_address(&code)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No address for region {}", code)))?;

    Ok(Json(ApiResponse::success(
        Some(RegionAddressResponseDto { code, full_address }),
        None,
        None,
    )))
}

/// Check whether a region code is well-formed and exists
#[utoipa::path(
    get,
    path = "/api/regions/{code}/validate",
    params(
        ("code" = String, Path, description = "Region code to check")
    ),
    responses(
        (status = 200, description = "Validation result", body = ApiResponse<CodeValidationResponseDto>)
    ),
    tag = "regions"
)]
pub async fn validate_region_code(
    State(service): State<Arc<RegionService>>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<CodeValidationResponseDto>>> {
    let valid = service.validate_code(&code).await?;
    let region_type = service.get_region_type(&code);
    let parent_code = parent_code(&code).map(str::to_string);

    Ok(Json(ApiResponse::success(
        Some(CodeValidationResponseDto {
            code,
            valid,
            region_type,
            parent_code,
        }),
        None,
        None,
    )))
}

// ==================== Cache Handlers ====================

/// Invalidate every cached region lookup
#[utoipa::path(
    delete,
    path = "/api/regions/cache",
    responses(
        (status = 200, description = "Cache cleared", body = ApiResponse<CacheClearResponseDto>),
        (status = 500, description = "Cache could not be cleared")
    ),
    tag = "regions"
)]
pub async fn clear_region_cache(
    State(service): State<Arc<RegionService>>,
) -> Result<Json<ApiResponse<CacheClearResponseDto>>> {
    if !service.clear_cache().await {
        return Err(AppError::Internal(
            "Region cache could not be cleared".to_string(),
        ));
    }

    Ok(Json(ApiResponse::success(
        Some(CacheClearResponseDto { cleared: true }),
        Some("Region cache cleared".to_string()),
        None,
    )))
}
