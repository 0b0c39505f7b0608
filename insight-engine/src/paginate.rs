//! Fixed-size pages over a filtered sequence, plus the numbered-button strip.

pub const DEFAULT_PAGE_SIZE: usize = 7;
pub const DEFAULT_PAGE_BUTTONS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    /// 1-based index of the first visible item, 0 when there are none.
    pub range_start: usize,
    pub range_end: usize,
    pub total: usize,
}

impl<T> Page<T> {
    pub fn range_label(&self) -> String {
        format!("{}-{}", self.range_start, self.range_end)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Never less than 1, even for an empty sequence.
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

pub fn clamp_page(requested: usize, count: usize, page_size: usize) -> usize {
    requested.clamp(1, total_pages(count, page_size))
}

pub fn paginate<T: Clone>(items: &[T], page_size: usize, requested_page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let current_page = clamp_page(requested_page, total, page_size);

    if total == 0 {
        return Page {
            items: Vec::new(),
            current_page,
            total_pages: 1,
            range_start: 0,
            range_end: 0,
            total,
        };
    }

    let offset = (current_page - 1) * page_size;
    let end = (offset + page_size).min(total);
    Page {
        items: items[offset..end].to_vec(),
        current_page,
        total_pages: total_pages(total, page_size),
        range_start: offset + 1,
        range_end: end,
        total,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Number(usize),
    Ellipsis,
}

/// At most `max_buttons` numbered pages centred on `current`, with shortcuts to
/// the first and last page (and an ellipsis for any gap) when the window
/// does not reach them.
pub fn page_window(current: usize, total: usize, max_buttons: usize) -> Vec<PageButton> {
    let total = total.max(1);
    let max_buttons = max_buttons.max(1);
    let current = current.clamp(1, total);

    if total <= max_buttons {
        return (1..=total).map(PageButton::Number).collect();
    }

    let mut start = current.saturating_sub(max_buttons / 2).max(1);
    let mut end = start + max_buttons - 1;
    if end > total {
        end = total;
        start = total + 1 - max_buttons;
    }

    let mut buttons = Vec::with_capacity(max_buttons + 4);
    if start > 1 {
        buttons.push(PageButton::Number(1));
        if start > 2 {
            buttons.push(PageButton::Ellipsis);
        }
    }
    buttons.extend((start..=end).map(PageButton::Number));
    if end < total {
        if end + 1 < total {
            buttons.push(PageButton::Ellipsis);
        }
        buttons.push(PageButton::Number(total));
    }
    buttons
}

/// Current page of a table; the page size is fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: usize,
    page_size: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Moves to `page`, clamped into range for `count` items. Returns the page landed on.
    pub fn goto(&mut self, page: usize, count: usize) -> usize {
        self.current_page = clamp_page(page, count, self.page_size);
        self.current_page
    }

    pub fn next(&mut self, count: usize) -> usize {
        self.goto(self.current_page.saturating_add(1), count)
    }

    pub fn previous(&mut self, count: usize) -> usize {
        self.goto(self.current_page.saturating_sub(1), count)
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
