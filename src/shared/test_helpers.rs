use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::core::error::Result;
use crate::features::regions::models::{Column, Region};
use crate::features::regions::services::query_builder::{ChildrenQuery, SearchQuery};
use crate::features::regions::services::region_cache::RegionCache;
use crate::features::regions::services::RegionService;
use crate::features::regions::stores::RegionStore;
use crate::modules::cache::{CacheBackend, CacheError, MemoryCacheBackend};
use crate::shared::types::{Page, PageRequest};

pub fn region(code: &str, name: &str, postal_code: Option<&str>) -> Region {
    Region {
        code: code.to_string(),
        name: Some(name.to_string()),
        postal_code: postal_code.map(str::to_string),
        latitude: None,
        longitude: None,
        status: None,
    }
}

/// Small slice of the national dataset, with names as stored (upper case)
pub fn fixture_regions() -> Vec<Region> {
    let mut aceh = region("11", "ACEH", None);
    aceh.latitude = Some(Decimal::new(4_695135, 6));
    aceh.longitude = Some(Decimal::new(96_749399, 6));

    vec![
        aceh,
        region("11.01", "KABUPATEN ACEH SELATAN", None),
        region("11.02", "KABUPATEN ACEH TENGGARA", None),
        region("11.01.01", "BAKONGAN", None),
        region("11.01.02", "KLUET UTARA", None),
        region("11.01.01.2001", "KEUDE BAKONGAN", Some("24651")),
        region("11.01.01.2002", "UJONG MANGKI", Some("24651")),
        region("31", "DKI JAKARTA", None),
        region("31.71", "KOTA ADMINISTRASI JAKARTA PUSAT", None),
        region("64", "KALIMANTAN TIMUR", None),
        region("64.72", "KOTA SAMARINDA", None),
        region("64.72.01", "SAMARINDA ILIR", None),
        region("64.72.01.1001", "SELILI", Some("75111")),
        region("64.72.01.1002", "SUNGAI DAMA", Some("75111")),
        // a non-village row carrying a postal code; must never match by postal code
        region("64.72.02", "SAMARINDA KOTA", Some("75111")),
    ]
}

/// In-memory [`RegionStore`] that counts every call
pub struct MemoryRegionStore {
    regions: Vec<Region>,
    calls: AtomicUsize,
}

impl MemoryRegionStore {
    pub fn new(regions: Vec<Region>) -> Self {
        Self {
            regions,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn children(&self, query: &ChildrenQuery, columns: &[Column]) -> Vec<Region> {
        let mut children: Vec<Region> = self
            .regions
            .iter()
            .filter(|region| query.matches(&region.code))
            .map(|region| region.clone().project(columns))
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        children
    }

    fn search_hits(&self, query: &SearchQuery, columns: &[Column]) -> Vec<Region> {
        let mut hits: Vec<Region> = self
            .regions
            .iter()
            .filter(|region| query.matches(region))
            .map(|region| region.clone().project(columns))
            .collect();
        hits.sort_by(|a, b| a.code.cmp(&b.code));
        hits
    }
}

impl Default for MemoryRegionStore {
    fn default() -> Self {
        Self::new(fixture_regions())
    }
}

fn paginate(items: Vec<Region>, page: PageRequest) -> Page<Region> {
    let total = items.len() as i64;
    let items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    Page::new(items, total, page)
}

#[async_trait]
impl RegionStore for MemoryRegionStore {
    async fn find_by_code(&self, code: &str, columns: &[Column]) -> Result<Option<Region>> {
        self.record_call();
        Ok(self
            .regions
            .iter()
            .find(|region| region.code == code)
            .map(|region| region.clone().project(columns)))
    }

    async fn list_children(
        &self,
        query: &ChildrenQuery,
        columns: &[Column],
    ) -> Result<Vec<Region>> {
        self.record_call();
        Ok(self.children(query, columns))
    }

    async fn paginate_children(
        &self,
        query: &ChildrenQuery,
        columns: &[Column],
        page: PageRequest,
    ) -> Result<Page<Region>> {
        self.record_call();
        Ok(paginate(self.children(query, columns), page))
    }

    async fn find_by_postal_code(
        &self,
        postal_code: &str,
        columns: &[Column],
    ) -> Result<Option<Region>> {
        self.record_call();
        Ok(self
            .regions
            .iter()
            .find(|region| region.postal_code.as_deref() == Some(postal_code))
            .map(|region| region.clone().project(columns)))
    }

    async fn exists(&self, code: &str) -> Result<bool> {
        self.record_call();
        Ok(self.regions.iter().any(|region| region.code == code))
    }

    async fn search(&self, query: &SearchQuery, columns: &[Column]) -> Result<Vec<Region>> {
        self.record_call();
        Ok(self.search_hits(query, columns))
    }

    async fn paginate_search(
        &self,
        query: &SearchQuery,
        columns: &[Column],
        page: PageRequest,
    ) -> Result<Page<Region>> {
        self.record_call();
        Ok(paginate(self.search_hits(query, columns), page))
    }
}

/// Memory backend whose operations can be switched to fail
#[derive(Default)]
pub struct FlakyCacheBackend {
    inner: MemoryCacheBackend,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_pattern_deletes: AtomicBool,
    fail_flush: AtomicBool,
    writes: AtomicUsize,
    flushes: AtomicUsize,
}

impl FlakyCacheBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_pattern_deletes(&self, fail: bool) {
        self.fail_pattern_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_flush(&self, fail: bool) {
        self.fail_flush.store(fail, Ordering::SeqCst);
    }

    /// Successful writes so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

fn unavailable() -> CacheError {
    CacheError::Unavailable("connection refused".to_string())
}

#[async_trait]
impl CacheBackend for FlakyCacheBackend {
    async fn get(&self, key: &str) -> std::result::Result<Option<Value>, CacheError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.get(key).await
    }

    async fn set(
        &self,
        key: &str,
        value: Value,
        ttl: Duration,
    ) -> std::result::Result<(), CacheError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.inner.set(key, value, ttl).await?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_matching(&self, pattern: &str) -> std::result::Result<bool, CacheError> {
        if self.fail_pattern_deletes.load(Ordering::SeqCst) {
            return Err(CacheError::Unsupported(
                "pattern deletion is not available".to_string(),
            ));
        }
        self.inner.delete_matching(pattern).await
    }

    async fn flush(&self) -> std::result::Result<bool, CacheError> {
        if self.fail_flush.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.flushes.fetch_add(1, Ordering::SeqCst);
        self.inner.flush().await
    }
}

/// Service over the fixture dataset with a fresh memory cache
pub fn fixture_service() -> (Arc<RegionService>, Arc<MemoryRegionStore>) {
    let store = Arc::new(MemoryRegionStore::default());
    let cache = RegionCache::new(
        Arc::new(MemoryCacheBackend::default()),
        Duration::from_secs(60),
    );
    let service = Arc::new(RegionService::new(store.clone(), cache));
    (service, store)
}
