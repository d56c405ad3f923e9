pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Cumulative pagination window: the visible set covers
/// `current_page * page_size` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub current_page: usize,
    pub page_size: usize,
}

impl PageState {
    /// `page_size` must be positive; zero is clamped to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.current_page.saturating_mul(self.page_size)
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
