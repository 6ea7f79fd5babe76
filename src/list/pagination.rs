//! Pagination window over a filtered list.

/// Current page, page size and item count.
///
/// `total_pages()` is always `ceil(total_items / page_size)` and `current_page`
/// always lies in `[1, max(total_pages, 1)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationWindow {
    current_page: usize,
    page_size: usize,
    total_items: usize,
}

impl PaginationWindow {
    /// A zero page size is bumped to 1
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
            total_items: 0,
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Highest page `current_page` may take; 1 for an empty list
    fn max_page(&self) -> usize {
        self.total_pages().max(1)
    }

    /// Move to page `n`, clamped into range
    pub fn set_page(&mut self, n: usize) {
        self.current_page = n.clamp(1, self.max_page());
    }

    /// Change the page size and return to the first page
    pub fn set_page_size(&mut self, n: usize) {
        self.page_size = n.max(1);
        self.current_page = 1;
    }

    /// Update the item count, keeping the current page if it still exists
    pub fn set_total_items(&mut self, total: usize) {
        self.total_items = total;
        self.current_page = self.current_page.clamp(1, self.max_page());
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.current_page.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.set_page(1);
    }

    pub fn last_page(&mut self) {
        self.set_page(self.max_page());
    }

    /// Index range of the current page within the filtered list
    pub fn window(&self) -> std::ops::Range<usize> {
        let start = (self.current_page - 1)
            .saturating_mul(self.page_size)
            .min(self.total_items);
        let end = start.saturating_add(self.page_size).min(self.total_items);
        start..end
    }

    /// Slice the current page out of `items`; never panics
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let range = self.window();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        &items[start..end]
    }

    /// "Showing 21-23 of 23" style label
    pub fn describe(&self) -> String {
        let range = self.window();
        if range.is_empty() {
            format!("Showing 0 of {}", self.total_items)
        } else {
            format!("Showing {}-{} of {}", range.start + 1, range.end, self.total_items)
        }
    }
}

impl Default for PaginationWindow {
    fn default() -> Self {
        Self::new(10)
    }
}
