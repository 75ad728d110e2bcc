//! Page windowing and slicing
//!
//! `page_window` compresses an arbitrary page count into at most seven
//! entries: first page, last page, the current page with its neighbours and
//! ellipsis markers in between. Everything here is pure.

use std::ops::Range;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Text used for an ellipsis marker when serialised.
pub const ELLIPSIS: &str = "...";

/// Entries beyond which the window starts eliding pages.
const MAX_UNELIDED_PAGES: u32 = 7;

/// One entry of a page selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageItem::Page(n) => serializer.serialize_u32(*n),
            PageItem::Ellipsis => serializer.serialize_str(ELLIPSIS),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("Page {page} is out of range (1..={total_pages})")]
    PageOutOfRange { page: u32, total_pages: u32 },
}

/// Compute the page selector entries for `current` out of `total` pages.
///
/// Callers validate `current` first; out-of-range values give a harmless but
/// meaningless window.
pub fn page_window(current: u32, total: u32) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total <= MAX_UNELIDED_PAGES {
        return (1..=total).map(Page).collect();
    }

    if current <= 4 {
        let mut window: Vec<PageItem> = (1..=5).map(Page).collect();
        window.extend([Ellipsis, Page(total)]);
        return window;
    }

    if current >= total - 3 {
        let mut window = vec![Page(1), Ellipsis];
        window.extend((total - 4..=total).map(Page));
        return window;
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current - 1),
        Page(current),
        Page(current + 1),
        Ellipsis,
        Page(total),
    ]
}

/// Number of pages needed for `item_count` items. A zero page size counts as one.
pub fn total_pages(item_count: usize, page_size: u32) -> u32 {
    let size = page_size.max(1) as usize;
    u32::try_from(item_count.div_ceil(size)).unwrap_or(u32::MAX)
}

fn page_bounds(len: usize, page: u32, page_size: u32) -> Range<usize> {
    if page == 0 {
        return 0..0;
    }
    let size = page_size.max(1) as usize;
    let start = (page as usize - 1).saturating_mul(size);
    if start >= len {
        return 0..0;
    }
    start..start.saturating_add(size).min(len)
}

/// `items[(page-1)*page_size .. page*page_size]`, clamped to the slice.
///
/// Pages past the end (and page 0) yield an empty slice.
pub fn paginate<T>(items: &[T], page: u32, page_size: u32) -> &[T] {
    &items[page_bounds(items.len(), page, page_size)]
}

/// One page of results together with its selector window
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_items: usize,
    pub total_pages: u32,
    pub window: Vec<PageItem>,
}

impl<T> Page<T> {
    /// Slice page `page` out of the full ordered list.
    ///
    /// Page 1 is always valid, even for an empty list; any other page must lie
    /// within `1..=total_pages`.
    pub fn from_items(mut all: Vec<T>, page: u32, page_size: u32) -> Result<Self, PaginationError> {
        let page_size = page_size.max(1);
        let total_items = all.len();
        let total_pages = total_pages(total_items, page_size);

        if page == 0 || page > total_pages.max(1) {
            return Err(PaginationError::PageOutOfRange { page, total_pages });
        }

        let items = all.drain(page_bounds(total_items, page, page_size)).collect();

        Ok(Self {
            items,
            page,
            page_size,
            total_items,
            total_pages,
            window: page_window(page, total_pages),
        })
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            window: self.window,
        }
    }
}
