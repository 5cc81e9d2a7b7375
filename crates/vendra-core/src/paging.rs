//! # Pagination Arithmetic
//!
//! Page-based slicing of locally filtered lists. Every list view pages the
//! same way: a fixed page size, `total_pages = max(1, ceil(len / size))`,
//! a clamped 1-based current page, and a reset to page 1 whenever the
//! search text changes.

use serde::{Deserialize, Serialize};

/// Rows per page across the list views.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A 1-based pager over a list whose length is supplied per call, since
/// filtering changes it between renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
    page_size: usize,
    current: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Self {
        Pager {
            page_size: page_size.max(1),
            current: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Current page, 1-based.
    pub fn current_page(&self) -> usize {
        self.current
    }

    /// Total pages for a list of `len` rows, never less than 1.
    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    /// Moves to `page`, clamped into `1..=total_pages(len)`.
    pub fn set_page(&mut self, page: usize, len: usize) {
        let total = self.total_pages(len);
        self.current = page.clamp(1, total);
    }

    pub fn next_page(&mut self, len: usize) {
        self.set_page(self.current + 1, len);
    }

    pub fn prev_page(&mut self, len: usize) {
        self.set_page(self.current.saturating_sub(1), len);
    }

    /// Back to page 1. Called whenever the search text changes.
    pub fn reset(&mut self) {
        self.current = 1;
    }

    /// Index of the first row on the current page.
    pub fn start_index(&self) -> usize {
        (self.current - 1) * self.page_size
    }

    /// The slice of `items` visible on the current page. A current page
    /// beyond the end (after the list shrank) yields an empty slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.start_index().min(items.len());
        let end = (start + self.page_size).min(items.len());
        &items[start..end]
    }
}

impl Default for Pager {
    fn default() -> Self {
        Pager::new(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_at_least_one() {
        let pager = Pager::new(10);
        assert_eq!(pager.total_pages(0), 1);
        assert_eq!(pager.total_pages(1), 1);
        assert_eq!(pager.total_pages(10), 1);
        assert_eq!(pager.total_pages(11), 2);
        assert_eq!(pager.total_pages(95), 10);
    }

    #[test]
    fn test_set_page_clamps() {
        let mut pager = Pager::new(10);
        pager.set_page(99, 25); // 3 pages
        assert_eq!(pager.current_page(), 3);
        pager.set_page(0, 25);
        assert_eq!(pager.current_page(), 1);
    }

    #[test]
    fn test_slicing_is_stable() {
        let items: Vec<i32> = (0..25).collect();
        let mut pager = Pager::new(10);

        assert_eq!(pager.slice(&items), &items[0..10]);
        pager.next_page(items.len());
        assert_eq!(pager.slice(&items), &items[10..20]);
        pager.next_page(items.len());
        assert_eq!(pager.slice(&items), &items[20..25]);
        // Already on the last page.
        pager.next_page(items.len());
        assert_eq!(pager.current_page(), 3);
    }

    #[test]
    fn test_slice_after_list_shrinks() {
        let mut pager = Pager::new(10);
        pager.set_page(3, 25);
        let shrunk: Vec<i32> = (0..5).collect();
        // Stale page over a shorter list must not panic.
        assert!(pager.slice(&shrunk).is_empty());
    }

    #[test]
    fn test_reset() {
        let mut pager = Pager::new(10);
        pager.set_page(2, 30);
        pager.reset();
        assert_eq!(pager.current_page(), 1);
    }
}
