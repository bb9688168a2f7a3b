//! Page slicing.
//!
//! Pages are 1-based. There is always at least one page, so an empty result
//! is page 1 of 1 with no rows.

use std::num::NonZeroUsize;

use serde::Serialize;

/// Rows per page when the host does not say otherwise.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => unreachable!(),
};

/// `max(1, ceil(len / page_size))`.
pub fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get()).max(1)
}

/// Clamps a requested page into `[1, total_pages]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Current position within the paged result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    /// Number of rows across all pages.
    pub total_rows: usize,
}

impl Default for PageInfo {
    /// Page 1 of 1 with no rows.
    fn default() -> Self {
        PageInfo {
            current_page: 1,
            total_pages: 1,
            total_rows: 0,
        }
    }
}

impl PageInfo {
    /// `false` on the first page.
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// `false` on the last page.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// The pager is hidden when there is nothing to page through.
    pub fn is_visible(&self) -> bool {
        self.total_rows > 0
    }

    /// `"<current> of <total>"`.
    pub fn label(&self) -> String {
        format!("{} of {}", self.current_page, self.total_pages)
    }
}

/// One page of a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub info: PageInfo,
}

/// Slices out one page.
///
/// The requested page is clamped into range; the effective page is reported
/// in [`PageInfo::current_page`] so the caller can persist the correction.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
/// use facetview_query::paginate;
///
/// let rows: Vec<u32> = (1..=25).collect();
/// let size = NonZeroUsize::new(10).unwrap();
///
/// let page = paginate(&rows, size, 3);
/// assert_eq!(page.items, &[21, 22, 23, 24, 25]);
/// assert_eq!(page.info.total_pages, 3);
///
/// let clamped = paginate(&rows, size, 99);
/// assert_eq!(clamped.info.current_page, 3);
/// ```
pub fn paginate<T>(items: &[T], page_size: NonZeroUsize, page: usize) -> Page<'_, T> {
    let total = total_pages(items.len(), page_size);
    let current = clamp_page(page, total);
    let start = ((current - 1) * page_size.get()).min(items.len());
    let end = (start + page_size.get()).min(items.len());

    Page {
        items: &items[start..end],
        info: PageInfo {
            current_page: current,
            total_pages: total,
            total_rows: items.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn total_pages_has_floor_of_one() {
        assert_eq!(total_pages(0, size(10)), 1);
        assert_eq!(total_pages(10, size(10)), 1);
        assert_eq!(total_pages(11, size(10)), 2);
        assert_eq!(total_pages(7, size(1)), 7);
    }

    #[test]
    fn empty_input_is_single_empty_page() {
        let rows: Vec<u8> = Vec::new();
        let page = paginate(&rows, size(10), 1);
        assert!(page.items.is_empty());
        assert_eq!(page.info.current_page, 1);
        assert_eq!(page.info.total_pages, 1);
        assert!(!page.info.is_visible());
    }

    #[test]
    fn last_page_may_be_short() {
        let rows: Vec<u8> = (0..23).collect();
        let page = paginate(&rows, size(10), 3);
        assert_eq!(page.items, &[20, 21, 22]);
    }

    #[test]
    fn out_of_range_requests_clamp() {
        let rows: Vec<u8> = (0..23).collect();
        assert_eq!(paginate(&rows, size(10), 0).info.current_page, 1);
        assert_eq!(paginate(&rows, size(10), 4).info.current_page, 3);
    }

    #[test]
    fn boundaries() {
        let info = PageInfo {
            current_page: 1,
            total_pages: 2,
            total_rows: 15,
        };
        assert!(!info.has_previous());
        assert!(info.has_next());
        assert_eq!(info.label(), "1 of 2");

        let last = PageInfo {
            current_page: 2,
            ..info
        };
        assert!(last.has_previous());
        assert!(!last.has_next());
    }

    #[test]
    fn default_page_size_is_ten() {
        assert_eq!(DEFAULT_PAGE_SIZE.get(), 10);
    }
}
