use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::regions::models::{
    column_signature, resolve_columns, Column, ColumnSelection, Region, RegionInfo,
    RegionType, RegionWithAddress, DEFAULT_COLUMNS,
};
use crate::features::regions::services::query_builder::{
    children_columns, children_query, search_columns, search_query, strip_postal_codes,
};
use crate::features::regions::services::region_cache::{CacheKey, CachePrefix, RegionCache};
use crate::features::regions::stores::RegionStore;
use crate::shared::constants::CACHE_KEY_DELIMITER;
use crate::shared::types::{Listing, PageRequest};

/// Lookup, search and address resolution over Indonesian administrative regions.
///
/// The dataset is read-only; every operation is a read and most are served
/// from the region cache.
pub struct RegionService {
    store: Arc<dyn RegionStore>,
    cache: RegionCache,
}

impl RegionService {
    pub fn new(store: Arc<dyn RegionStore>, cache: RegionCache) -> Self {
        Self { store, cache }
    }

    // ==================== Listing ====================

    /// Direct children of `parent_code` (provinces when absent), ordered by name.
    ///
    /// Paginated listings are never cached.
    pub async fn get_regions(
        &self,
        parent_code: Option<&str>,
        selection: &ColumnSelection,
        page: Option<PageRequest>,
    ) -> Result<Listing<Region>> {
        let columns = children_columns(parent_code, resolve_columns(selection));

        match page {
            Some(page) => {
                let query = children_query(parent_code);
                let page = self.store.paginate_children(&query, &columns, page).await?;
                Ok(Listing::Paged(page.map(|region| region.project(&columns))))
            }
            None => Ok(Listing::All(
                self.cached_children(parent_code, &columns).await?,
            )),
        }
    }

    /// Children as a code → name map, for choice widgets
    pub async fn get_for_select(
        &self,
        parent_code: Option<&str>,
    ) -> Result<BTreeMap<String, String>> {
        let columns = [Column::Code, Column::Name];
        let regions = self.cached_children(parent_code, &columns).await?;

        Ok(regions
            .into_iter()
            .map(|region| {
                let name = region.name.unwrap_or_default();
                (region.code, name)
            })
            .collect())
    }

    async fn cached_children(
        &self,
        parent_code: Option<&str>,
        columns: &[Column],
    ) -> Result<Vec<Region>> {
        let key = CacheKey::with_signature(
            CachePrefix::Regions,
            parent_code.unwrap_or_default(),
            &column_signature(columns),
        );

        self.cache
            .remember(&key, || async {
                let query = children_query(parent_code);
                let regions = self.store.list_children(&query, columns).await?;
                Ok(regions
                    .into_iter()
                    .map(|region| region.project(columns))
                    .collect::<Vec<_>>())
            })
            .await
    }

    // ==================== Single lookups ====================

    pub async fn find_by_code(
        &self,
        code: &str,
        selection: &ColumnSelection,
    ) -> Result<Option<Region>> {
        let columns = resolve_columns(selection);
        self.find_projected(code, &columns).await
    }

    async fn find_projected(&self, code: &str, columns: &[Column]) -> Result<Option<Region>> {
        let key = CacheKey::with_signature(CachePrefix::Region, code, &column_signature(columns));

        self.cache
            .remember(&key, || async {
                let region = self.store.find_by_code(code, columns).await?;
                Ok(region.map(|region| region.project(columns)))
            })
            .await
    }

    /// First region with exactly this postal code, default columns
    pub async fn find_by_postal_code(&self, postal_code: &str) -> Result<Option<Region>> {
        let key = CacheKey::new(CachePrefix::PostalCode, postal_code);

        self.cache
            .remember(&key, || async {
                let region = self
                    .store
                    .find_by_postal_code(postal_code, &DEFAULT_COLUMNS)
                    .await?;
                Ok(region.map(|region| region.project(&DEFAULT_COLUMNS)))
            })
            .await
    }

    // ==================== Hierarchy ====================

    /// Resolve a code and its ancestors, with a composed address.
    ///
    /// Ancestor codes come from truncation; the code itself only counts as a
    /// village when it has a village-length code. Without a province the
    /// result is empty.
    pub async fn get_region_info(
        &self,
        code: &str,
        selection: &ColumnSelection,
    ) -> Result<RegionInfo> {
        let columns = resolve_columns(selection);
        let key =
            CacheKey::with_signature(CachePrefix::Hierarchy, code, &column_signature(&columns));

        self.cache
            .remember(&key, || self.resolve_hierarchy(code, &columns))
            .await
    }

    async fn resolve_hierarchy(&self, code: &str, columns: &[Column]) -> Result<RegionInfo> {
        let mut info = RegionInfo::default();

        for level in RegionType::LEVELS {
            let level_code = match level {
                RegionType::Village => (code.len() == level.code_length()).then_some(code),
                _ => code.get(..level.code_length()),
            };
            let Some(level_code) = level_code else {
                continue;
            };

            if let Some(region) = self.find_projected(level_code, columns).await? {
                info.set_level(level, region.into_level_record(level, columns));
            }
        }

        if info.is_empty() {
            tracing::debug!("No province found for region code {}", code);
            return Ok(RegionInfo::default());
        }

        info.full_address = Some(info.build_full_address());
        Ok(info)
    }

    pub async fn get_full_address(&self, code: &str) -> Result<Option<String>> {
        let info = self
            .get_region_info(code, &ColumnSelection::Default)
            .await?;
        Ok(info.full_address)
    }

    // ==================== Search ====================

    /// Case-insensitive name search; numeric terms also match village postal codes.
    pub async fn search(
        &self,
        term: &str,
        region_type: Option<RegionType>,
        page: Option<PageRequest>,
        selection: &ColumnSelection,
    ) -> Result<Listing<Region>> {
        if page.is_some() {
            return self.perform_search(term, region_type, page, selection).await;
        }

        let signature = format!(
            "{}{}{}",
            region_type.map_or("all", RegionType::as_str),
            CACHE_KEY_DELIMITER,
            selection.signature()
        );
        let key = CacheKey::with_signature(CachePrefix::Search, term, &signature);

        let regions = self
            .cache
            .remember(&key, || async {
                match self
                    .perform_search(term, region_type, None, selection)
                    .await?
                {
                    Listing::All(regions) => Ok(regions),
                    Listing::Paged(page) => Ok(page.items),
                }
            })
            .await?;

        Ok(Listing::All(regions))
    }

    async fn perform_search(
        &self,
        term: &str,
        region_type: Option<RegionType>,
        page: Option<PageRequest>,
        selection: &ColumnSelection,
    ) -> Result<Listing<Region>> {
        let columns = search_columns(region_type, &resolve_columns(selection));
        let query = search_query(term, region_type);

        let mut listing = match page {
            Some(page) => Listing::Paged(
                self.store
                    .paginate_search(&query, &columns, page)
                    .await?
                    .map(|region| region.project(&columns)),
            ),
            None => Listing::All(
                self.store
                    .search(&query, &columns)
                    .await?
                    .into_iter()
                    .map(|region| region.project(&columns))
                    .collect(),
            ),
        };

        if columns.contains(&Column::PostalCode) {
            match &mut listing {
                Listing::All(regions) => strip_postal_codes(regions),
                Listing::Paged(page) => strip_postal_codes(&mut page.items),
            }
        }

        Ok(listing)
    }

    /// [`RegionService::search`] with every hit annotated with its full address
    pub async fn search_with_address(
        &self,
        term: &str,
        region_type: Option<RegionType>,
        page: Option<PageRequest>,
        selection: &ColumnSelection,
    ) -> Result<Listing<RegionWithAddress>> {
        let listing = self.search(term, region_type, page, selection).await?;

        let mut addresses = Vec::with_capacity(listing.items().len());
        for region in listing.items() {
            addresses.push(self.get_full_address(&region.code).await?);
        }

        let mut addresses = addresses.into_iter();
        Ok(listing.map(|region| RegionWithAddress {
            region,
            full_address: addresses.next().flatten(),
        }))
    }

    // ==================== Classification ====================

    pub fn get_region_type(&self, code: &str) -> Option<RegionType> {
        RegionType::from_code(code)
    }

    /// Whether `code` has a valid length and exists in the store
    pub async fn validate_code(&self, code: &str) -> Result<bool> {
        if self.get_region_type(code).is_none() {
            return Ok(false);
        }

        let key = CacheKey::new(CachePrefix::ValidateCode, code);
        self.cache
            .remember(&key, || self.store.exists(code))
            .await
    }

    pub async fn clear_cache(&self) -> bool {
        self.cache.clear_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::fixture_service;

    fn codes(regions: &[Region]) -> Vec<&str> {
        regions.iter().map(|region| region.code.as_str()).collect()
    }

    #[tokio::test]
    async fn test_provinces_are_listed_by_name() {
        let (service, _) = fixture_service();

        let listing = service
            .get_regions(None, &ColumnSelection::Default, None)
            .await
            .unwrap();

        assert!(!listing.is_paginated());
        assert_eq!(codes(listing.items()), vec!["11", "31", "64"]);
        assert!(listing.items().iter().all(|r| r.postal_code.is_none()));
    }

    #[tokio::test]
    async fn test_children_exclude_grandchildren() {
        let (service, _) = fixture_service();

        let listing = service
            .get_regions(Some("11"), &ColumnSelection::Default, None)
            .await
            .unwrap();

        assert_eq!(codes(listing.items()), vec!["11.01", "11.02"]);
        for region in listing.items() {
            assert_eq!(parent_of(&region.code), Some("11"));
        }
    }

    fn parent_of(code: &str) -> Option<&str> {
        crate::features::regions::models::parent_code(code)
    }

    #[tokio::test]
    async fn test_villages_list_postal_codes_by_default() {
        let (service, _) = fixture_service();

        let listing = service
            .get_regions(Some("11.01.01"), &ColumnSelection::Default, None)
            .await
            .unwrap();

        assert_eq!(codes(listing.items()), vec!["11.01.01.2001", "11.01.01.2002"]);
        assert!(listing
            .items()
            .iter()
            .all(|r| r.postal_code.as_deref() == Some("24651")));
    }

    #[tokio::test]
    async fn test_invalid_parent_has_no_children() {
        let (service, _) = fixture_service();

        let listing = service
            .get_regions(Some("110"), &ColumnSelection::Default, None)
            .await
            .unwrap();
        assert!(listing.items().is_empty());
    }

    #[tokio::test]
    async fn test_children_are_cached() {
        let (service, store) = fixture_service();

        let first = service
            .get_regions(Some("11"), &ColumnSelection::Default, None)
            .await
            .unwrap();
        let calls = store.calls();
        let second = service
            .get_regions(Some("11"), &ColumnSelection::Default, None)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.calls(), calls);
    }

    #[tokio::test]
    async fn test_paginated_children_bypass_cache() {
        let (service, store) = fixture_service();

        for _ in 0..2 {
            let listing = service
                .get_regions(None, &ColumnSelection::Default, Some(PageRequest::new(2, 2)))
                .await
                .unwrap();
            let Listing::Paged(page) = listing else {
                panic!("expected a page");
            };
            assert_eq!(page.total, 3);
            assert_eq!(page.last_page, 2);
            assert_eq!(codes(&page.items), vec!["64"]);
        }

        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_select_keys_match_listing() {
        let (service, _) = fixture_service();

        let options = service.get_for_select(Some("11")).await.unwrap();
        let listing = service
            .get_regions(Some("11"), &ColumnSelection::Default, None)
            .await
            .unwrap();

        let keys: Vec<&str> = options.keys().map(String::as_str).collect();
        assert_eq!(keys, codes(listing.items()));
        assert_eq!(options["11.01"], "KABUPATEN ACEH SELATAN");
    }

    #[tokio::test]
    async fn test_find_by_code_with_all_columns() {
        let (service, _) = fixture_service();

        let aceh = service
            .find_by_code("11", &ColumnSelection::All)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(aceh.name.as_deref(), Some("ACEH"));
        assert!(aceh.latitude.is_some());

        let projected = service
            .find_by_code("11", &ColumnSelection::Explicit(vec![Column::Name]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(projected.code, "11");
        assert!(projected.latitude.is_none());

        assert!(service
            .find_by_code("99", &ColumnSelection::Default)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_dotted_code_lookup_does_not_shadow_projection() {
        let (service, _) = fixture_service();

        let missing = service
            .find_by_code("11.code", &ColumnSelection::Explicit(vec![Column::Name]))
            .await
            .unwrap();
        assert!(missing.is_none());

        let aceh = service
            .find_by_code(
                "11",
                &ColumnSelection::Explicit(vec![Column::Code, Column::Name]),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(aceh.name.as_deref(), Some("ACEH"));
    }

    #[tokio::test]
    async fn test_province_hierarchy() {
        let (service, _) = fixture_service();

        let info = service
            .get_region_info("11", &ColumnSelection::Default)
            .await
            .unwrap();

        assert_eq!(info.province.as_ref().unwrap().code, "11");
        assert!(info.city.is_none());
        assert!(info.district.is_none());
        assert!(info.village.is_none());
        assert_eq!(info.full_address.as_deref(), Some("Aceh, Indonesia"));
    }

    #[tokio::test]
    async fn test_page_far_beyond_the_data_is_empty() {
        let (service, _) = fixture_service();

        let listing = service
            .get_regions(
                None,
                &ColumnSelection::Default,
                PageRequest::from_params(Some(i64::MAX / 10), Some(100)),
            )
            .await
            .unwrap();

        assert!(listing.items().is_empty());
        assert_eq!(listing.into_parts().1.total, 3);
    }

    #[tokio::test]
    async fn test_village_hierarchy() {
        let (service, _) = fixture_service();

        let info = service
            .get_region_info("11.01.01.2001", &ColumnSelection::Default)
            .await
            .unwrap();

        assert_eq!(info.province.as_ref().unwrap().name.as_deref(), Some("Aceh"));
        assert_eq!(
            info.city.as_ref().unwrap().name.as_deref(),
            Some("Kabupaten Aceh Selatan")
        );
        assert_eq!(info.district.as_ref().unwrap().code, "11.01.01");
        assert!(info.district.as_ref().unwrap().postal_code.is_none());

        let village = info.village.as_ref().unwrap();
        assert_eq!(village.name.as_deref(), Some("Keude Bakongan"));
        assert_eq!(village.postal_code.as_deref(), Some("24651"));

        assert_eq!(
            info.full_address.as_deref(),
            Some("Keude Bakongan, Bakongan, Kabupaten Aceh Selatan, Aceh, Indonesia, 24651")
        );
    }

    #[tokio::test]
    async fn test_hierarchy_levels_are_truncations() {
        let (service, _) = fixture_service();

        let info = service
            .get_region_info("64.72.01.1001", &ColumnSelection::Default)
            .await
            .unwrap();

        let village = info.village.as_ref().unwrap();
        let district = info.district.as_ref().unwrap();
        let city = info.city.as_ref().unwrap();
        let province = info.province.as_ref().unwrap();
        assert!(village.code.starts_with(&district.code));
        assert!(district.code.starts_with(&city.code));
        assert!(city.code.starts_with(&province.code));
    }

    #[tokio::test]
    async fn test_city_hierarchy_has_no_village() {
        let (service, _) = fixture_service();

        let info = service
            .get_region_info("11.01", &ColumnSelection::Default)
            .await
            .unwrap();

        assert!(info.district.is_none());
        assert!(info.village.is_none());
        assert_eq!(
            info.full_address.as_deref(),
            Some("Kabupaten Aceh Selatan, Aceh, Indonesia")
        );
    }

    #[tokio::test]
    async fn test_unknown_province_gives_empty_info() {
        let (service, _) = fixture_service();

        let info = service
            .get_region_info("99.01", &ColumnSelection::Default)
            .await
            .unwrap();
        assert_eq!(info, RegionInfo::default());

        assert_eq!(service.get_full_address("99").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_region_info_is_cached() {
        let (service, store) = fixture_service();

        let first = service
            .get_region_info("11.01.01.2001", &ColumnSelection::Default)
            .await
            .unwrap();
        assert_eq!(store.calls(), 4);

        let second = service
            .get_region_info("11.01.01.2001", &ColumnSelection::Default)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(store.calls(), 4);
    }

    #[tokio::test]
    async fn test_search_by_name_strips_non_village_postal_codes() {
        let (service, _) = fixture_service();

        let listing = service
            .search("samarinda", None, None, &ColumnSelection::Default)
            .await
            .unwrap();

        assert_eq!(codes(listing.items()), vec!["64.72", "64.72.01", "64.72.02"]);
        assert!(listing.items().iter().all(|r| r.postal_code.is_none()));
    }

    #[tokio::test]
    async fn test_numeric_search_matches_village_postal_codes() {
        let (service, _) = fixture_service();

        let listing = service
            .search("75111", None, None, &ColumnSelection::Default)
            .await
            .unwrap();

        assert_eq!(codes(listing.items()), vec!["64.72.01.1001", "64.72.01.1002"]);
        assert!(listing
            .items()
            .iter()
            .all(|r| r.postal_code.as_deref() == Some("75111")));
    }

    #[tokio::test]
    async fn test_numeric_search_outside_villages_ignores_postal_codes() {
        let (service, _) = fixture_service();

        let listing = service
            .search("75111", Some(RegionType::District), None, &ColumnSelection::Default)
            .await
            .unwrap();
        assert!(listing.items().is_empty());
    }

    #[tokio::test]
    async fn test_search_within_level() {
        let (service, _) = fixture_service();

        let listing = service
            .search("aceh", Some(RegionType::Province), None, &ColumnSelection::Default)
            .await
            .unwrap();
        assert_eq!(codes(listing.items()), vec!["11"]);

        let villages = service
            .search("bakongan", Some(RegionType::Village), None, &ColumnSelection::Default)
            .await
            .unwrap();
        assert_eq!(codes(villages.items()), vec!["11.01.01.2001"]);
        assert_eq!(villages.items()[0].postal_code.as_deref(), Some("24651"));
    }

    #[tokio::test]
    async fn test_search_pages() {
        let (service, _) = fixture_service();

        let listing = service
            .search(
                "samarinda",
                None,
                Some(PageRequest::new(1, 2)),
                &ColumnSelection::Default,
            )
            .await
            .unwrap();

        let Listing::Paged(page) = listing else {
            panic!("expected a page");
        };
        assert_eq!(page.total, 3);
        assert_eq!(codes(&page.items), vec!["64.72", "64.72.01"]);
    }

    #[tokio::test]
    async fn test_search_with_address() {
        let (service, _) = fixture_service();

        let listing = service
            .search_with_address("selili", None, None, &ColumnSelection::Default)
            .await
            .unwrap();

        assert_eq!(listing.items().len(), 1);
        assert_eq!(
            listing.items()[0].full_address.as_deref(),
            Some("Selili, Samarinda Ilir, Kota Samarinda, Kalimantan Timur, Indonesia, 75111")
        );
    }

    #[tokio::test]
    async fn test_find_by_postal_code() {
        let (service, _) = fixture_service();

        let region = service.find_by_postal_code("24651").await.unwrap().unwrap();
        assert_eq!(region.code, "11.01.01.2001");
        assert_eq!(region.postal_code.as_deref(), Some("24651"));

        assert!(service.find_by_postal_code("00000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_validate_code() {
        let (service, store) = fixture_service();

        assert!(!service.validate_code("110").await.unwrap());
        assert!(!service.validate_code("").await.unwrap());
        assert_eq!(store.calls(), 0);

        assert!(service.validate_code("11.01").await.unwrap());
        assert!(!service.validate_code("11.99").await.unwrap());
        assert_eq!(store.calls(), 2);

        assert!(service.validate_code("11.01").await.unwrap());
        assert_eq!(store.calls(), 2);
    }

    #[test]
    fn test_get_region_type() {
        let (service, _) = fixture_service();
        assert_eq!(service.get_region_type("11"), Some(RegionType::Province));
        assert_eq!(
            service.get_region_type("11.01.01.2001"),
            Some(RegionType::Village)
        );
        assert_eq!(service.get_region_type("1101"), None);
    }

    #[tokio::test]
    async fn test_clear_cache_forces_reload() {
        let (service, store) = fixture_service();

        service
            .get_regions(None, &ColumnSelection::Default, None)
            .await
            .unwrap();
        assert_eq!(store.calls(), 1);

        assert!(service.clear_cache().await);

        service
            .get_regions(None, &ColumnSelection::Default, None)
            .await
            .unwrap();
        assert_eq!(store.calls(), 2);
    }
}
