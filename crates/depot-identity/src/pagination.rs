//! Pagination types
//!
//! Shared page request/response shapes for listing endpoints. Filters
//! (including ownership scoping) are applied before counting, so totals
//! stay correct for every caller.

use serde::{Deserialize, Serialize};

/// A 1-based page request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
}

impl PageRequest {
    /// Create a page request.
    ///
    /// Page numbers below 1 are clamped to 1; a zero page size is
    /// clamped to 1.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// The number of items to skip.
    pub fn offset(&self) -> usize {
        ((self.page - 1) as usize) * self.per_page as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

/// One page of results plus pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total_items: usize,
    /// Total number of pages.
    pub total_pages: u32,
    /// The 1-based page number of this page.
    pub current_page: u32,
    /// Page size used.
    pub per_page: u32,
}

impl<T> Page<T> {
    /// Build a page from the full filtered item set.
    ///
    /// `matching` must already have every filter applied; this slices out
    /// the requested window and computes the totals.
    pub fn from_filtered(matching: Vec<T>, request: PageRequest) -> Self {
        let total_items = matching.len();
        let total_pages = total_items.div_ceil(request.per_page as usize) as u32;
        let items: Vec<T> = matching
            .into_iter()
            .skip(request.offset())
            .take(request.per_page as usize)
            .collect();
        Self {
            items,
            total_items,
            total_pages,
            current_page: request.page,
            per_page: request.per_page,
        }
    }
}
