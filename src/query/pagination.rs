use serde::Serialize;

pub const PER_PAGE: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
}

impl Page {
    // Pages are 1-based; anything below 1 is the first page
    pub fn new(page: Option<i64>) -> Self {
        Page {
            page: page.unwrap_or(1).max(1),
            per_page: PER_PAGE,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Never less than 1, so an empty result still renders one page.
    pub fn total_pages(&self, total_count: i64) -> i64 {
        (total_count.saturating_add(self.per_page - 1) / self.per_page).max(1)
    }

    pub fn prev_page(&self) -> i64 {
        (self.page - 1).max(1)
    }

    pub fn next_page(&self, total_count: i64) -> i64 {
        self.page.saturating_add(1).min(self.total_pages(total_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        let page = Page::new(None);
        assert_eq!(page.page, 1);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn non_positive_pages_are_clamped() {
        assert_eq!(Page::new(Some(0)).page, 1);
        assert_eq!(Page::new(Some(-4)).offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        assert_eq!(Page::new(Some(3)).offset(), 40);
    }

    #[test]
    fn total_pages_rounds_up_and_is_at_least_one() {
        let page = Page::new(None);
        assert_eq!(page.total_pages(0), 1);
        assert_eq!(page.total_pages(20), 1);
        assert_eq!(page.total_pages(21), 2);
        assert_eq!(page.total_pages(45), 3);
    }

    #[test]
    fn huge_page_does_not_overflow() {
        let page = Page::new(Some(i64::MAX));
        assert_eq!(page.offset(), i64::MAX);
        assert_eq!(page.prev_page(), i64::MAX - 1);
        assert_eq!(page.next_page(45), 3);
        assert_eq!(page.total_pages(i64::MAX), i64::MAX / PER_PAGE);
    }

    #[test]
    fn neighbours_stay_in_range() {
        let first = Page::new(Some(1));
        assert_eq!(first.prev_page(), 1);
        assert_eq!(first.next_page(45), 2);

        let last = Page::new(Some(3));
        assert_eq!(last.prev_page(), 2);
        assert_eq!(last.next_page(45), 3);
    }
}
