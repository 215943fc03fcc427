//! Pagination query parameters and envelope.

use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// `?page=&page_size=` query parameters.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PaginationParams {
    #[validate(range(min = 1, message = "Page must be greater than 0"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 200, message = "Page size must be between 1 and 200"))]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// `(page, page_size)` with defaults applied.
    pub fn resolve(&self) -> (i64, i64) {
        (
            i64::from(self.page.unwrap_or(1)),
            i64::from(self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)),
        )
    }
}

/// A page of items plus totals.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: i64, page_size: i64, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + page_size - 1) / page_size
        };

        Self {
            items,
            page,
            page_size,
            total,
            total_pages,
        }
    }
}
