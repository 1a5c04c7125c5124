//! Page-window calculation for feed pagination controls.
//!
//! Given the current page, the page count and a window size, this decides
//! which page links to draw, where the ellipses go, and whether Previous and
//! Next are usable. Everything here is a pure function of those inputs.

/// Number of numbered page links shown around the current page
pub const DEFAULT_WINDOW_SIZE: u32 = 5;

/// One element of the numbered part of the pagination bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page { number: u32, active: bool },
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub current_page: u32,
    pub total_pages: u32,
    pub start_page: u32,
    pub end_page: u32,
    pub show_leading_ellipsis: bool,
    pub show_trailing_ellipsis: bool,
}

impl PageWindow {
    /// Window with the default size of 5
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        Self::compute(current_page, total_pages, DEFAULT_WINDOW_SIZE)
    }

    /// Compute the window around `current_page`.
    ///
    /// Out-of-range inputs are clamped: `total_pages` to at least 1,
    /// `current_page` into `1..=total_pages`, `window_size` to at least 1.
    pub fn compute(current_page: u32, total_pages: u32, window_size: u32) -> Self {
        let total = total_pages.max(1);
        let current = current_page.clamp(1, total);
        let window = window_size.max(1);

        let mut start = current.saturating_sub(window / 2).max(1);
        let end = total.min(start.saturating_add(window - 1));

        if end - start + 1 < window {
            start = end.saturating_sub(window - 1).max(1);
        }

        Self {
            current_page: current,
            total_pages: total,
            start_page: start,
            end_page: end,
            show_leading_ellipsis: start > 2,
            show_trailing_ellipsis: end < total.saturating_sub(1),
        }
    }

    /// Number of pages inside the window, never zero
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u32 {
        self.end_page - self.start_page + 1
    }

    pub fn pages(&self) -> impl Iterator<Item = u32> {
        self.start_page..=self.end_page
    }

    /// A separate link to page 1 precedes the window
    pub fn shows_first_page(&self) -> bool {
        self.start_page > 1
    }

    /// A separate link to the last page follows the window
    pub fn shows_last_page(&self) -> bool {
        self.end_page < self.total_pages
    }

    /// Target of the Previous control, `None` when it is disabled
    pub fn previous(&self) -> Option<u32> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    /// Target of the Next control, `None` when it is disabled
    pub fn next(&self) -> Option<u32> {
        (self.current_page < self.total_pages).then(|| self.current_page + 1)
    }

    /// Numbered links and ellipses in display order
    pub fn items(&self) -> Vec<PageItem> {
        let page = |number: u32| PageItem::Page {
            number,
            active: number == self.current_page,
        };

        let mut items = Vec::with_capacity(self.len() as usize + 4);
        if self.shows_first_page() {
            items.push(page(1));
            if self.show_leading_ellipsis {
                items.push(PageItem::Ellipsis);
            }
        }
        items.extend(self.pages().map(page));
        if self.shows_last_page() {
            if self.show_trailing_ellipsis {
                items.push(PageItem::Ellipsis);
            }
            items.push(page(self.total_pages));
        }
        items
    }
}
