use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::MAX_PAGE_SIZE;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_page: Option<i64>,
}

impl Meta {
    pub fn total(total: i64) -> Self {
        Self {
            total,
            page: None,
            page_size: None,
            last_page: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Offset pagination request (1-indexed page)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Highest page whose offset still fits an `i64`
    const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.clamp(1, Self::MAX_PAGE),
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Build a request from optional query parameters.
    ///
    /// Pagination is opt-in: without a page size the caller gets the full list.
    pub fn from_params(page: Option<i64>, page_size: Option<i64>) -> Option<Self> {
        page_size.map(|size| Self::new(page.unwrap_or(1), size))
    }

    /// Calculate SQL OFFSET from page number
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// One page of results plus the total row count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub last_page: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        let last_page = ((total + request.per_page - 1) / request.per_page).max(1);
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
            last_page,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            last_page: self.last_page,
        }
    }

    pub fn meta(&self) -> Meta {
        Meta {
            total: self.total,
            page: Some(self.page),
            page_size: Some(self.per_page),
            last_page: Some(self.last_page),
        }
    }
}

/// Result of a listing operation: either the complete collection or one page of it
#[derive(Debug, Clone, PartialEq)]
pub enum Listing<T> {
    All(Vec<T>),
    Paged(Page<T>),
}

impl<T> Listing<T> {
    pub fn is_paginated(&self) -> bool {
        matches!(self, Listing::Paged(_))
    }

    pub fn items(&self) -> &[T] {
        match self {
            Listing::All(items) => items,
            Listing::Paged(page) => &page.items,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Listing<U> {
        match self {
            Listing::All(items) => Listing::All(items.into_iter().map(f).collect()),
            Listing::Paged(page) => Listing::Paged(page.map(&mut f)),
        }
    }

    /// Split into the items and the response meta (total for full lists, page info for pages)
    pub fn into_parts(self) -> (Vec<T>, Meta) {
        match self {
            Listing::All(items) => {
                let total = items.len() as i64;
                (items, Meta::total(total))
            }
            Listing::Paged(page) => {
                let meta = page.meta();
                (page.items, meta)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_offset_and_clamp() {
        let request = PageRequest::new(3, 15);
        assert_eq!(request.offset(), 30);
        assert_eq!(request.limit(), 15);

        let clamped = PageRequest::new(0, 10_000);
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.per_page, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_huge_page_offset_does_not_overflow() {
        let request = PageRequest::new(i64::MAX, MAX_PAGE_SIZE);
        assert!(request.offset() >= 0);

        let request = PageRequest::from_params(Some(i64::MAX / 10), Some(100)).unwrap();
        assert!(request.offset() > 0);
    }

    #[test]
    fn test_page_request_is_opt_in() {
        assert_eq!(PageRequest::from_params(Some(2), None), None);
        assert_eq!(
            PageRequest::from_params(None, Some(5)),
            Some(PageRequest::new(1, 5))
        );
    }

    #[test]
    fn test_page_last_page() {
        let page = Page::new(vec![1, 2], 21, PageRequest::new(1, 10));
        assert_eq!(page.last_page, 3);

        let empty: Page<i32> = Page::new(vec![], 0, PageRequest::new(1, 10));
        assert_eq!(empty.last_page, 1);
    }

    #[test]
    fn test_listing_into_parts() {
        let (items, meta) = Listing::All(vec!["a", "b"]).into_parts();
        assert_eq!(items.len(), 2);
        assert_eq!(meta.total, 2);
        assert!(meta.page.is_none());

        let paged = Listing::Paged(Page::new(vec!["a"], 4, PageRequest::new(2, 1)));
        assert!(paged.is_paginated());
        let (_, meta) = paged.into_parts();
        assert_eq!(meta.page, Some(2));
        assert_eq!(meta.last_page, Some(4));
    }
}
