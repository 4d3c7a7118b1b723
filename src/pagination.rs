use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Pagination query parameters extracted from the HTTP request
/// Both are optional and must be positive when given
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PaginationParams {
    /// Page number (1-indexed, defaults to 1)
    #[validate(range(min = 1, message = "page must be a positive integer"))]
    pub page: Option<u32>,
    /// Items per page (defaults to 10)
    #[validate(range(min = 1, message = "limit must be a positive integer"))]
    pub limit: Option<u32>,
}

/// Validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PaginationParams {
    /// Validates the parameters and applies defaults
    pub fn into_request(self) -> Result<PageRequest, validator::ValidationErrors> {
        self.validate()?;
        Ok(PageRequest {
            page: self.page.unwrap_or(DEFAULT_PAGE),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
        })
    }
}

impl PageRequest {
    /// Number of records to skip: (page - 1) * limit
    pub fn skip(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

/// A page of results with its metadata
///
/// `total_items` counts the whole collection, independent of the window.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_items: i64,
    pub total_pages: i64,
    pub current_page: u32,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(request: PageRequest, total_items: i64, data: Vec<T>) -> Self {
        Self {
            total_items,
            total_pages: total_pages(total_items, request.limit),
            current_page: request.page,
            data,
        }
    }
}

/// ceil(total_items / limit)
pub fn total_pages(total_items: i64, limit: u32) -> i64 {
    let limit = i64::from(limit.max(1));
    (total_items + limit - 1) / limit
}
