use serde::{Deserialize, Serialize};

use super::region::Region;
use super::region_type::RegionType;
use crate::shared::constants::{ADDRESS_SEPARATOR, COUNTRY_NAME};

/// A region resolved together with all of its ancestors
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
}

impl RegionInfo {
    /// Unresolvable hierarchy (no province)
    pub fn is_empty(&self) -> bool {
        self.province.is_none()
    }

    pub fn level(&self, level: RegionType) -> Option<&Region> {
        match level {
            RegionType::Province => self.province.as_ref(),
            RegionType::City => self.city.as_ref(),
            RegionType::District => self.district.as_ref(),
            RegionType::Village => self.village.as_ref(),
        }
    }

    pub fn set_level(&mut self, level: RegionType, record: Region) {
        let slot = match level {
            RegionType::Province => &mut self.province,
            RegionType::City => &mut self.city,
            RegionType::District => &mut self.district,
            RegionType::Village => &mut self.village,
        };
        *slot = Some(record);
    }

    /// Level names from most to least specific, then the country, then the
    /// village postal code when one is known
    pub fn build_full_address(&self) -> String {
        let mut parts: Vec<&str> = RegionType::LEVELS
            .iter()
            .rev()
            .filter_map(|level| self.level(*level)?.name.as_deref())
            .filter(|name| !name.is_empty())
            .collect();
        parts.push(COUNTRY_NAME);

        let address = parts.join(ADDRESS_SEPARATOR);
        match self
            .village
            .as_ref()
            .and_then(|village| village.postal_code.as_deref())
        {
            Some(postal_code) => format!("{}{}{}", address, ADDRESS_SEPARATOR, postal_code),
            None => address,
        }
    }
}

/// Search hit annotated with its composed address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionWithAddress {
    #[serde(flatten)]
    pub region: Region,
    pub full_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(code: &str, name: &str) -> Region {
        Region {
            code: code.to_string(),
            name: Some(name.to_string()),
            postal_code: None,
            latitude: None,
            longitude: None,
            status: None,
        }
    }

    #[test]
    fn test_province_only_address() {
        let mut info = RegionInfo::default();
        info.set_level(RegionType::Province, named("11", "Aceh"));
        assert_eq!(info.build_full_address(), "Aceh, Indonesia");
    }

    #[test]
    fn test_village_address_with_postal_code() {
        let mut village = named("11.01.01.2001", "Keude Bakongan");
        village.postal_code = Some("24651".to_string());

        let mut info = RegionInfo::default();
        info.set_level(RegionType::Province, named("11", "Aceh"));
        info.set_level(RegionType::City, named("11.01", "Kabupaten Aceh Selatan"));
        info.set_level(RegionType::District, named("11.01.01", "Bakongan"));
        info.set_level(RegionType::Village, village);

        assert_eq!(
            info.build_full_address(),
            "Keude Bakongan, Bakongan, Kabupaten Aceh Selatan, Aceh, Indonesia, 24651"
        );
    }

    #[test]
    fn test_address_skips_missing_levels() {
        let mut info = RegionInfo::default();
        info.set_level(RegionType::Province, named("11", "Aceh"));
        info.set_level(RegionType::District, named("11.01.01", "Bakongan"));
        assert_eq!(info.build_full_address(), "Bakongan, Aceh, Indonesia");
    }

    #[test]
    fn test_empty_info_serializes_as_empty_object() {
        let info = RegionInfo::default();
        assert!(info.is_empty());
        assert_eq!(serde_json::to_value(&info).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_region_with_address_is_flat() {
        let hit = RegionWithAddress {
            region: named("11", "ACEH"),
            full_address: Some("Aceh, Indonesia".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&hit).unwrap(),
            serde_json::json!({ "code": "11", "name": "ACEH", "full_address": "Aceh, Indonesia" })
        );
    }
}
