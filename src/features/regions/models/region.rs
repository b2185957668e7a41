use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::column::Column;
use super::region_type::RegionType;

/// Indonesian administrative region (wilayah) at any level.
///
/// Rows are read with a column projection, so every attribute except the
/// code may be missing from a given instance. `#[sqlx(default)]` lets a
/// partial `SELECT` decode into the same struct.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Region {
    pub code: String,
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<Decimal>,
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<Decimal>,
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Region {
    pub fn region_type(&self) -> Option<RegionType> {
        RegionType::from_code(&self.code)
    }

    pub fn is_village(&self) -> bool {
        self.region_type() == Some(RegionType::Village)
    }

    /// Keep only the given columns (the code is always kept)
    pub fn project(mut self, columns: &[Column]) -> Self {
        if !columns.contains(&Column::Name) {
            self.name = None;
        }
        if !columns.contains(&Column::PostalCode) {
            self.postal_code = None;
        }
        if !columns.contains(&Column::Latitude) {
            self.latitude = None;
        }
        if !columns.contains(&Column::Longitude) {
            self.longitude = None;
        }
        if !columns.contains(&Column::Status) {
            self.status = None;
        }
        self
    }

    /// Record for one level of a hierarchy: projected, display-cased name,
    /// postal code only at village level
    pub fn into_level_record(self, level: RegionType, columns: &[Column]) -> Self {
        let mut record = self.project(columns);
        record.name = record.name.as_deref().map(format_name);
        if level != RegionType::Village {
            record.postal_code = None;
        }
        record
    }
}

/// Title-case a region name regardless of stored casing ("KOTA BANDA ACEH" -> "Kota Banda Aceh")
pub fn format_name(name: &str) -> String {
    let mut formatted = String::with_capacity(name.len());
    let mut at_word_start = true;

    for ch in name.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            formatted.push(ch);
        } else if at_word_start {
            at_word_start = false;
            formatted.extend(ch.to_uppercase());
        } else {
            formatted.extend(ch.to_lowercase());
        }
    }

    formatted
}
