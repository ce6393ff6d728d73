use serde::Serialize;

/// Fixed page size for every listing and search view.
pub const PAGE_SIZE: u64 = 12;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Slices an ordered result set into fixed-size pages.
///
/// Pages are 1-indexed. Requests outside the valid range clamp to the
/// nearest valid page instead of erroring, and an empty result set still
/// has one (empty) page.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    total_items: u64,
    page_size: u64,
}

impl Paginator {
    pub fn new(total_items: u64, page_size: u64) -> Self {
        Paginator {
            total_items,
            page_size: page_size.max(1),
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_items.div_ceil(self.page_size).max(1)
    }

    /// Resolves a requested page number: absent or invalid requests fall
    /// back to the first page, out-of-range requests clamp to the last.
    pub fn clamp_page(&self, requested: Option<u64>) -> u64 {
        match requested {
            None | Some(0) => 1,
            Some(page) => page.min(self.total_pages()),
        }
    }

    pub fn offset(&self, page: u64) -> u64 {
        (page.saturating_sub(1)) * self.page_size
    }

    pub fn meta(&self, page: u64) -> PageMeta {
        let total_pages = self.total_pages();
        PageMeta {
            current_page: page,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_five_items_span_three_pages() {
        let paginator = Paginator::new(25, PAGE_SIZE);
        assert_eq!(paginator.total_pages(), 3);

        let first = paginator.meta(1);
        assert!(first.has_next);
        assert!(!first.has_previous);
        assert_eq!(paginator.offset(1), 0);

        let last = paginator.meta(3);
        assert!(!last.has_next);
        assert!(last.has_previous);
        // Page 3 holds the single remaining record
        assert_eq!(paginator.offset(3), 24);
    }

    #[test]
    fn out_of_range_page_clamps_to_last() {
        let paginator = Paginator::new(25, PAGE_SIZE);
        assert_eq!(paginator.clamp_page(Some(99)), 3);
    }

    #[test]
    fn missing_or_zero_page_falls_back_to_first() {
        let paginator = Paginator::new(25, PAGE_SIZE);
        assert_eq!(paginator.clamp_page(None), 1);
        assert_eq!(paginator.clamp_page(Some(0)), 1);
    }

    #[test]
    fn empty_set_still_has_one_page() {
        let paginator = Paginator::new(0, PAGE_SIZE);
        assert_eq!(paginator.total_pages(), 1);

        let meta = paginator.meta(paginator.clamp_page(Some(5)));
        assert_eq!(meta.current_page, 1);
        assert!(!meta.has_next);
        assert!(!meta.has_previous);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let paginator = Paginator::new(24, PAGE_SIZE);
        assert_eq!(paginator.total_pages(), 2);
        assert!(!paginator.meta(2).has_next);
    }
}
