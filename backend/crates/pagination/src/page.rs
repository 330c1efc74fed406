//! A single page of results together with its navigation metadata.

use serde::Serialize;

use crate::PageWindow;

/// One page of a listing.
///
/// Serialises with the navigation fields templates expect
/// (`has_next`, `next_page_number`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    number: u64,
    num_pages: u64,
    count: u64,
    has_next: bool,
    has_previous: bool,
    next_page_number: Option<u64>,
    previous_page_number: Option<u64>,
}

impl<T> Page<T> {
    /// Wrap the items fetched for `window`.
    #[must_use]
    pub fn new(window: PageWindow, items: Vec<T>) -> Self {
        let has_next = window.has_next();
        let has_previous = window.has_previous();
        Self {
            items,
            number: window.number(),
            num_pages: window.num_pages(),
            count: window.total(),
            has_next,
            has_previous,
            next_page_number: has_next.then(|| window.number() + 1),
            previous_page_number: has_previous.then(|| window.number() - 1),
        }
    }

    /// Items on this page, in listing order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Iterate over the items on this page.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based page number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Total number of pages.
    #[must_use]
    pub const fn num_pages(&self) -> u64 {
        self.num_pages
    }

    /// Total number of items across all pages.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.has_previous
    }

    /// Number of the following page, if any.
    #[must_use]
    pub const fn next_page_number(&self) -> Option<u64> {
        self.next_page_number
    }

    /// Number of the preceding page, if any.
    #[must_use]
    pub const fn previous_page_number(&self) -> Option<u64> {
        self.previous_page_number
    }

    /// Transform every item while keeping the navigation metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_page_number: self.next_page_number,
            previous_page_number: self.previous_page_number,
        }
    }
}

impl<'a, T> IntoIterator for &'a Page<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
