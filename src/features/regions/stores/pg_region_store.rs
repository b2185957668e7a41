use async_trait::async_trait;
use sqlx::PgPool;

use super::RegionStore;
use crate::core::error::{AppError, Result};
use crate::features::regions::models::{Column, Region, RegionType};
use crate::features::regions::services::query_builder::{ChildrenQuery, SearchQuery};
use crate::shared::types::{Page, PageRequest};

const TABLE: &str = "indonesia_regions";

/// Postgres-backed region store
pub struct PgRegionStore {
    pool: PgPool,
}

impl PgRegionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// SELECT list built from the column whitelist; `code` is always first
fn select_list(columns: &[Column]) -> String {
    let mut names = vec![Column::Code.as_str()];
    for column in columns {
        if !names.contains(&column.as_str()) {
            names.push(column.as_str());
        }
    }
    names.join(", ")
}

/// WHERE clause for a children query, `$1` = code length, `$2` = prefix
fn children_filter(query: &ChildrenQuery) -> &'static str {
    match query.prefix {
        None => "char_length(code) = $1",
        Some(_) => "char_length(code) = $1 AND starts_with(code, $2)",
    }
}

/// Number of bind parameters used by [`children_filter`]
fn children_param_count(query: &ChildrenQuery) -> usize {
    if query.prefix.is_some() {
        2
    } else {
        1
    }
}

/// WHERE clause for a search, `$1` = term, `$2` = level code length
fn search_filter(query: &SearchQuery) -> String {
    let mut filter = String::from("(strpos(LOWER(name), LOWER($1)) > 0");
    if query.match_postal_code {
        filter.push_str(&format!(
            " OR (strpos(postal_code, $1) > 0 AND char_length(code) = {})",
            RegionType::Village.code_length()
        ));
    }
    filter.push(')');
    if query.region_type.is_some() {
        filter.push_str(" AND char_length(code) = $2");
    }
    filter
}

fn search_param_count(query: &SearchQuery) -> usize {
    if query.region_type.is_some() {
        2
    } else {
        1
    }
}

fn level_length(region_type: RegionType) -> i32 {
    region_type.code_length() as i32
}

#[async_trait]
impl RegionStore for PgRegionStore {
    async fn find_by_code(&self, code: &str, columns: &[Column]) -> Result<Option<Region>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE code = $1",
            select_list(columns),
            TABLE
        );

        sqlx::query_as::<_, Region>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch region by code {}: {:?}", code, e);
                AppError::Database(e)
            })
    }

    async fn list_children(
        &self,
        query: &ChildrenQuery,
        columns: &[Column],
    ) -> Result<Vec<Region>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY name ASC",
            select_list(columns),
            TABLE,
            children_filter(query)
        );

        let mut statement =
            sqlx::query_as::<_, Region>(&sql).bind(query.code_length as i32);
        if let Some(prefix) = &query.prefix {
            statement = statement.bind(prefix);
        }

        statement.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to list regions for {:?}: {:?}", query.prefix, e);
            AppError::Database(e)
        })
    }

    async fn paginate_children(
        &self,
        query: &ChildrenQuery,
        columns: &[Column],
        page: PageRequest,
    ) -> Result<Page<Region>> {
        let filter = children_filter(query);
        let next_param = children_param_count(query) + 1;

        let count_sql = format!("SELECT COUNT(*) FROM {} WHERE {}", TABLE, filter);
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql).bind(query.code_length as i32);
        if let Some(prefix) = &query.prefix {
            count = count.bind(prefix);
        }
        let total = count.fetch_one(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to count regions for {:?}: {:?}", query.prefix, e);
            AppError::Database(e)
        })?;

        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY name ASC LIMIT ${} OFFSET ${}",
            select_list(columns),
            TABLE,
            filter,
            next_param,
            next_param + 1
        );
        let mut statement =
            sqlx::query_as::<_, Region>(&sql).bind(query.code_length as i32);
        if let Some(prefix) = &query.prefix {
            statement = statement.bind(prefix);
        }
        let items = statement
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to page regions for {:?}: {:?}", query.prefix, e);
                AppError::Database(e)
            })?;

        Ok(Page::new(items, total, page))
    }

    async fn find_by_postal_code(
        &self,
        postal_code: &str,
        columns: &[Column],
    ) -> Result<Option<Region>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE postal_code = $1 LIMIT 1",
            select_list(columns),
            TABLE
        );

        sqlx::query_as::<_, Region>(&sql)
            .bind(postal_code)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to fetch region by postal code {}: {:?}",
                    postal_code,
                    e
                );
                AppError::Database(e)
            })
    }

    async fn exists(&self, code: &str) -> Result<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE code = $1)", TABLE);

        sqlx::query_scalar::<_, bool>(&sql)
            .bind(code)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check region code {}: {:?}", code, e);
                AppError::Database(e)
            })
    }

    async fn search(&self, query: &SearchQuery, columns: &[Column]) -> Result<Vec<Region>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY code ASC",
            select_list(columns),
            TABLE,
            search_filter(query)
        );

        let mut statement = sqlx::query_as::<_, Region>(&sql).bind(&query.term);
        if let Some(region_type) = query.region_type {
            statement = statement.bind(level_length(region_type));
        }

        statement.fetch_all(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to search regions for '{}': {:?}", query.term, e);
            AppError::Database(e)
        })
    }

    async fn paginate_search(
        &self,
        query: &SearchQuery,
        columns: &[Column],
        page: PageRequest,
    ) -> Result<Page<Region>> {
        let filter = search_filter(query);
        let next_param = search_param_count(query) + 1;

        let count_sql = format!("SELECT COUNT(*) FROM {} WHERE {}", TABLE, filter);
        let mut count = sqlx::query_scalar::<_, i64>(&count_sql).bind(&query.term);
        if let Some(region_type) = query.region_type {
            count = count.bind(level_length(region_type));
        }
        let total = count.fetch_one(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to count search results for '{}': {:?}", query.term, e);
            AppError::Database(e)
        })?;

        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY code ASC LIMIT ${} OFFSET ${}",
            select_list(columns),
            TABLE,
            filter,
            next_param,
            next_param + 1
        );
        let mut statement = sqlx::query_as::<_, Region>(&sql).bind(&query.term);
        if let Some(region_type) = query.region_type {
            statement = statement.bind(level_length(region_type));
        }
        let items = statement
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to page search results for '{}': {:?}", query.term, e);
                AppError::Database(e)
            })?;

        Ok(Page::new(items, total, page))
    }
}
