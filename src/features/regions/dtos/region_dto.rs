use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::regions::models::{
    ColumnSelection, Region, RegionInfo, RegionType, RegionWithAddress,
};
use crate::shared::types::PageRequest;

fn parse_columns(raw: Option<&str>) -> Result<ColumnSelection> {
    ColumnSelection::parse(raw).map_err(AppError::BadRequest)
}

/// Query parameters for listing the children of a region
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RegionListQuery {
    /// Parent region code; provinces are listed when omitted
    #[param(example = "11.01")]
    pub parent_code: Option<String>,
    /// Comma-separated columns, or `*` for all
    #[param(example = "code,name,postal_code")]
    pub columns: Option<String>,
    pub page: Option<i64>,
    /// Enables pagination when present
    pub page_size: Option<i64>,
}

impl RegionListQuery {
    pub fn selection(&self) -> Result<ColumnSelection> {
        parse_columns(self.columns.as_deref())
    }

    pub fn page_request(&self) -> Option<PageRequest> {
        PageRequest::from_params(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct RegionSelectQuery {
    #[param(example = "11")]
    pub parent_code: Option<String>,
}

/// Query parameters for region search
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
pub struct RegionSearchQuery {
    /// Name fragment (case-insensitive); digits also match village postal codes
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Search term must be 1-100 characters"))]
    #[param(example = "samarinda")]
    pub q: String,
    /// Restrict to one level: province, city, district or village
    #[serde(rename = "type")]
    #[param(example = "village")]
    pub region_type: Option<String>,
    pub columns: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// Attach the full address to every result
    #[serde(default)]
    pub with_address: bool,
}

impl RegionSearchQuery {
    /// Trimmed search term; blank terms would match every row
    pub fn term(&self) -> Result<&str> {
        let term = self.q.trim();
        if term.is_empty() {
            return Err(AppError::BadRequest(
                "Search term must not be blank".to_string(),
            ));
        }
        Ok(term)
    }

    pub fn selection(&self) -> Result<ColumnSelection> {
        parse_columns(self.columns.as_deref())
    }

    pub fn level(&self) -> Result<Option<RegionType>> {
        self.region_type
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<RegionType>().map_err(AppError::BadRequest))
            .transpose()
    }

    pub fn page_request(&self) -> Option<PageRequest> {
        PageRequest::from_params(self.page, self.page_size)
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ColumnsQuery {
    /// Comma-separated columns, or `*` for all
    pub columns: Option<String>,
}

impl ColumnsQuery {
    pub fn selection(&self) -> Result<ColumnSelection> {
        parse_columns(self.columns.as_deref())
    }
}

/// Response DTO for a region; only the selected columns are present
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionResponseDto {
    #[schema(example = "11.01")]
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl From<Region> for RegionResponseDto {
    fn from(region: Region) -> Self {
        Self {
            code: region.code,
            name: region.name,
            postal_code: region.postal_code,
            latitude: region.latitude,
            longitude: region.longitude,
            status: region.status,
        }
    }
}

/// Search hit; `full_address` is present when requested and resolvable
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionSearchResponseDto {
    #[serde(flatten)]
    pub region: RegionResponseDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
}

impl From<Region> for RegionSearchResponseDto {
    fn from(region: Region) -> Self {
        Self {
            region: region.into(),
            full_address: None,
        }
    }
}

impl From<RegionWithAddress> for RegionSearchResponseDto {
    fn from(hit: RegionWithAddress) -> Self {
        Self {
            region: hit.region.into(),
            full_address: hit.full_address,
        }
    }
}

/// Region hierarchy from province down to the requested level
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegionInfoResponseDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub province: Option<RegionResponseDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<RegionResponseDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<RegionResponseDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub village: Option<RegionResponseDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Keude Bakongan, Bakongan, Kabupaten Aceh Selatan, Aceh, Indonesia, 24651")]
    pub full_address: Option<String>,
}

impl From<RegionInfo> for RegionInfoResponseDto {
    fn from(info: RegionInfo) -> Self {
        Self {
            province: info.province.map(Into::into),
            city: info.city.map(Into::into),
            district: info.district.map(Into::into),
            village: info.village.map(Into::into),
            full_address: info.full_address,
        }
    }
}

/// Code → name options for choice widgets
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionOptionsResponseDto {
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionAddressResponseDto {
    pub code: String,
    pub full_address: String,
}

/// Result of checking a region code
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CodeValidationResponseDto {
    pub code: String,
    pub valid: bool,
    /// Level implied by the code length, if any
    pub region_type: Option<RegionType>,
    pub parent_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CacheClearResponseDto {
    pub cleared: bool,
}
