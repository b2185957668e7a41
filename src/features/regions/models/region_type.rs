use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Administrative level of a region, inferred from the length of its code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RegionType {
    /// Provinsi
    Province,
    /// Kabupaten/Kota
    City,
    /// Kecamatan
    District,
    /// Kelurahan/Desa
    Village,
}

impl RegionType {
    /// All levels from broadest to most specific
    pub const LEVELS: [RegionType; 4] = [
        RegionType::Province,
        RegionType::City,
        RegionType::District,
        RegionType::Village,
    ];

    pub const fn code_length(self) -> usize {
        match self {
            RegionType::Province => 2,
            RegionType::City => 5,
            RegionType::District => 8,
            RegionType::Village => 13,
        }
    }

    pub fn from_code_length(length: usize) -> Option<Self> {
        Self::LEVELS
            .into_iter()
            .find(|level| level.code_length() == length)
    }

    /// Classify a code; any length outside the hierarchy yields `None`
    pub fn from_code(code: &str) -> Option<Self> {
        Self::from_code_length(code.len())
    }

    /// The level directly below this one
    pub const fn child(self) -> Option<Self> {
        match self {
            RegionType::Province => Some(RegionType::City),
            RegionType::City => Some(RegionType::District),
            RegionType::District => Some(RegionType::Village),
            RegionType::Village => None,
        }
    }

    pub const fn parent(self) -> Option<Self> {
        match self {
            RegionType::Province => None,
            RegionType::City => Some(RegionType::Province),
            RegionType::District => Some(RegionType::City),
            RegionType::Village => Some(RegionType::District),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            RegionType::Province => "province",
            RegionType::City => "city",
            RegionType::District => "district",
            RegionType::Village => "village",
        }
    }
}

impl fmt::Display for RegionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::LEVELS
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown region type '{}', expected one of: province, city, district, village",
                    s
                )
            })
    }
}

/// Code of the parent region, obtained by truncating to the parent level's length
pub fn parent_code(code: &str) -> Option<&str> {
    let parent = RegionType::from_code(code)?.parent()?;
    code.get(..parent.code_length())
}
