//! Region storage seam.
//!
//! The service only talks to [`RegionStore`]; the Postgres implementation is
//! the production adapter.

mod pg_region_store;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::regions::models::{Column, Region};
use crate::features::regions::services::query_builder::{ChildrenQuery, SearchQuery};
use crate::shared::types::{Page, PageRequest};

pub use pg_region_store::PgRegionStore;

/// Read-only access to the seeded region table.
///
/// `columns` is the projection to load; implementations always load `code`.
#[async_trait]
pub trait RegionStore: Send + Sync {
    async fn find_by_code(&self, code: &str, columns: &[Column]) -> Result<Option<Region>>;

    /// Children ordered by name ascending
    async fn list_children(&self, query: &ChildrenQuery, columns: &[Column])
        -> Result<Vec<Region>>;

    async fn paginate_children(
        &self,
        query: &ChildrenQuery,
        columns: &[Column],
        page: PageRequest,
    ) -> Result<Page<Region>>;

    /// First region carrying exactly this postal code
    async fn find_by_postal_code(
        &self,
        postal_code: &str,
        columns: &[Column],
    ) -> Result<Option<Region>>;

    async fn exists(&self, code: &str) -> Result<bool>;

    async fn search(&self, query: &SearchQuery, columns: &[Column]) -> Result<Vec<Region>>;

    async fn paginate_search(
        &self,
        query: &SearchQuery,
        columns: &[Column],
        page: PageRequest,
    ) -> Result<Page<Region>>;
}
