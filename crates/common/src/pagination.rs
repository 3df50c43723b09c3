//! Fixed-size page-number pagination.
//!
//! Listings are paginated with 1-indexed page numbers. A requested page
//! outside the valid range clamps to the nearest valid page instead of
//! erroring, so stale links keep working.

use serde::Serialize;

/// Page size for photo, search, and profile listings.
pub const PHOTOS_PER_PAGE: u64 = 12;

/// Page size for album listings.
pub const ALBUMS_PER_PAGE: u64 = 9;

/// A single page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    /// Items on this page.
    pub items: Vec<T>,
    /// 1-indexed page number (after clamping).
    pub page: u64,
    /// Total number of pages (at least 1).
    pub page_count: u64,
    /// Page size.
    pub per_page: u64,
    /// Total number of items across all pages.
    pub total: u64,
}

impl<T: Serialize> Page<T> {
    /// Whether a page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    /// Whether a page precedes this one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Map the items of this page, keeping the page metadata.
    pub fn map<U: Serialize, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_count: self.page_count,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

/// Computes offsets and clamped page numbers for a fixed page size.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    per_page: u64,
}

impl Paginator {
    /// Create a paginator with the given page size.
    #[must_use]
    pub const fn new(per_page: u64) -> Self {
        debug_assert!(per_page > 0);
        Self { per_page }
    }

    /// Paginator for photo-shaped listings (12 per page).
    #[must_use]
    pub const fn photos() -> Self {
        Self::new(PHOTOS_PER_PAGE)
    }

    /// Paginator for album listings (9 per page).
    #[must_use]
    pub const fn albums() -> Self {
        Self::new(ALBUMS_PER_PAGE)
    }

    /// Page size.
    #[must_use]
    pub const fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of pages for `total` items. An empty listing still has one
    /// (empty) page.
    #[must_use]
    pub const fn page_count(&self, total: u64) -> u64 {
        if total == 0 {
            1
        } else {
            total.div_ceil(self.per_page)
        }
    }

    /// Clamp a requested 1-indexed page number into the valid range for
    /// `total` items. `None` and `0` resolve to the first page; anything
    /// past the end resolves to the last page.
    #[must_use]
    pub const fn clamp_page(&self, requested: Option<u64>, total: u64) -> u64 {
        let page_count = self.page_count(total);
        match requested {
            None | Some(0) => 1,
            Some(p) if p > page_count => page_count,
            Some(p) => p,
        }
    }

    /// Row offset for a (clamped) 1-indexed page.
    #[must_use]
    pub const fn offset(&self, page: u64) -> u64 {
        (page.saturating_sub(1)) * self.per_page
    }

    /// Assemble a [`Page`] from query results.
    #[must_use]
    pub fn page_of<T: Serialize>(&self, items: Vec<T>, page: u64, total: u64) -> Page<T> {
        Page {
            items,
            page,
            page_count: self.page_count(total),
            per_page: self.per_page,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        let p = Paginator::photos();
        assert_eq!(p.page_count(0), 1);
        assert_eq!(p.page_count(12), 1);
        assert_eq!(p.page_count(13), 2);
        assert_eq!(p.page_count(24), 2);
    }

    #[test]
    fn test_clamp_out_of_range_pages() {
        let p = Paginator::photos();
        // 25 items -> 3 pages
        assert_eq!(p.clamp_page(None, 25), 1);
        assert_eq!(p.clamp_page(Some(0), 25), 1);
        assert_eq!(p.clamp_page(Some(2), 25), 2);
        assert_eq!(p.clamp_page(Some(3), 25), 3);
        assert_eq!(p.clamp_page(Some(99), 25), 3);
    }

    #[test]
    fn test_clamp_on_empty_listing() {
        let p = Paginator::albums();
        assert_eq!(p.clamp_page(Some(7), 0), 1);
    }

    #[test]
    fn test_offset() {
        let p = Paginator::photos();
        assert_eq!(p.offset(1), 0);
        assert_eq!(p.offset(3), 24);
    }

    #[test]
    fn test_page_navigation_flags() {
        let p = Paginator::albums();
        let page = p.page_of(vec![1, 2, 3], 2, 20);
        assert_eq!(page.page_count, 3);
        assert!(page.has_next());
        assert!(page.has_previous());
    }
}
