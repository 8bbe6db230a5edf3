//! Pagination types for list endpoints

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

/// Standard pagination parameters for list endpoints
#[derive(Debug, Deserialize, IntoParams, ToSchema, Clone)]
pub struct PaginationParams {
    #[param(example = 1, minimum = 1)]
    pub page: Option<u32>,

    #[param(example = 50, minimum = 1, maximum = 100)]
    pub page_size: Option<u32>,
}

impl PaginationParams {
    /// Get the page number (defaults to 1, minimum 1)
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Get the page size (defaults to 50, clamped between 1 and 100)
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(50).clamp(1, 100)
    }

    /// Offset for SQL queries. Computed in i64: `page` is unbounded caller
    /// input and the product can exceed u32.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page()) - 1) * i64::from(self.page_size())
    }

    /// Limit for SQL queries (alias for page_size)
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size())
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            page_size: Some(50),
        }
    }
}
