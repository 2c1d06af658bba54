//! Pagination metadata for the reviews list

use serde::{Deserialize, Serialize};

/// Page size used when neither config nor caller supplies one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Pagination metadata as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number (1-indexed)
    pub page: u32,
    pub page_size: u32,
    /// Total matching reviews
    pub total: u64,
    /// Total number of pages
    pub total_pages: u32,
}

impl PageMeta {
    /// Calculate pagination metadata from total results and requested page
    ///
    /// Ensures page is within valid bounds [1, total_pages]
    ///
    /// # Examples
    /// ```
    /// use rvx_explorer::pagination::PageMeta;
    ///
    /// // 250 total results at 100/page = 3 pages (100 + 100 + 50)
    /// let p = PageMeta::calculate(250, 100, 2);
    /// assert_eq!(p.page, 2);
    /// assert_eq!(p.total_pages, 3);
    /// assert_eq!(p.offset(), 100);
    ///
    /// // Requesting out-of-bounds page gets clamped
    /// let p = PageMeta::calculate(250, 100, 99);
    /// assert_eq!(p.page, 3);
    /// ```
    pub fn calculate(total: u64, page_size: u32, requested_page: u32) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total.div_ceil(u64::from(page_size)).min(u64::from(u32::MAX)) as u32;
        let page = requested_page.max(1).min(total_pages.max(1));

        Self {
            page,
            page_size,
            total,
            total_pages,
        }
    }

    /// Row offset of the first review on this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = PageMeta::calculate(250, 100, 2);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset(), 100);
        assert!(p.has_next());
        assert!(p.has_prev());
    }

    #[test]
    fn test_pagination_first_page() {
        let p = PageMeta::calculate(150, 100, 1);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset(), 0);
        assert!(!p.has_prev());
    }

    #[test]
    fn test_pagination_last_page() {
        let p = PageMeta::calculate(250, 100, 3);
        assert_eq!(p.page, 3);
        assert!(!p.has_next());
    }

    #[test]
    fn test_pagination_out_of_bounds_low() {
        let p = PageMeta::calculate(150, 100, 0);
        assert_eq!(p.page, 1); // Clamped to first page
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_empty() {
        let p = PageMeta::calculate(0, 20, 1);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next());
        assert!(!p.has_prev());
    }

    #[test]
    fn test_pagination_exact_page_boundary() {
        let p = PageMeta::calculate(200, 100, 2);
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset(), 100);
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let p = PageMeta::calculate(3, 0, 2);
        assert_eq!(p.page_size, 1);
        assert_eq!(p.total_pages, 3);
    }
}
