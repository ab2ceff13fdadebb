//! Paginated list envelope used by the CRM backend.

use serde::{Deserialize, Serialize};

/// One page of a list endpoint.
///
/// The backend answers `{ data, currentPage, totalPages, totalRows, pageSize }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    /// The items in the current page.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Current page number (1-indexed).
    #[serde(default = "default_page")]
    pub current_page: u32,
    /// Total number of pages; zero when the list is empty.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of rows across all pages.
    #[serde(default)]
    pub total_rows: u64,
}

fn default_page() -> u32 {
    1
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, current_page: u32, total_pages: u32, total_rows: u64) -> Self {
        Self {
            data,
            current_page,
            total_pages,
            total_rows,
        }
    }

    /// Returns true if a page after this one exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Returns true if a page before this one exists.
    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}
