//! Page arithmetic: page counts, clamping and slice windows.

use thiserror::Error;

use crate::{Page, PageRequest};

/// Errors raised when constructing a [`Paginator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Pages must hold at least one item.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Splits ordered result sets into fixed-size pages.
///
/// # Examples
/// ```
/// use pagination::{PageRequest, Paginator};
///
/// let paginator = Paginator::new(10).expect("non-zero page size");
/// let page = paginator.paginate((0..13).collect::<Vec<_>>(), PageRequest::Number(2));
/// assert_eq!(page.items(), &[10, 11, 12]);
/// assert!(page.has_previous());
/// assert!(!page.has_next());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u64,
}

impl Paginator {
    /// Create a paginator producing pages of `per_page` items.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when `per_page` is zero.
    pub const fn new(per_page: u64) -> Result<Self, PaginationError> {
        if per_page == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self { per_page })
    }

    /// Number of items on a full page.
    #[must_use]
    pub const fn per_page(&self) -> u64 {
        self.per_page
    }

    /// Number of pages needed for `total` items. An empty listing still has
    /// one (empty) page.
    #[must_use]
    pub const fn num_pages(&self, total: u64) -> u64 {
        if total == 0 {
            1
        } else {
            total.div_ceil(self.per_page)
        }
    }

    /// Resolve a request against a listing of `total` items.
    ///
    /// Numbers below one clamp to the first page and numbers past the end
    /// clamp to the last page.
    #[must_use]
    pub fn window(&self, total: u64, request: PageRequest) -> PageWindow {
        let num_pages = self.num_pages(total);
        let number = match request {
            PageRequest::Last => num_pages,
            PageRequest::Number(requested) if requested < 1 => 1,
            PageRequest::Number(requested) => {
                u64::try_from(requested).map_or(num_pages, |requested| requested.min(num_pages))
            }
        };
        let offset = (number - 1).saturating_mul(self.per_page);
        let limit = self.per_page.min(total.saturating_sub(offset));
        PageWindow {
            number,
            num_pages,
            total,
            offset,
            limit,
        }
    }

    /// Slice an already materialised, ordered sequence.
    #[must_use]
    pub fn paginate<T>(&self, items: Vec<T>, request: PageRequest) -> Page<T> {
        let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
        let window = self.window(total, request);
        let offset = usize::try_from(window.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit()).unwrap_or(usize::MAX);
        let slice = items.into_iter().skip(offset).take(limit).collect();
        Page::new(window, slice)
    }
}

/// A resolved page position: which page, and which slice of the listing it
/// covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    number: u64,
    num_pages: u64,
    total: u64,
    offset: u64,
    limit: u64,
}

impl PageWindow {
    /// 1-based page number after clamping.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Total number of pages in the listing.
    #[must_use]
    pub const fn num_pages(&self) -> u64 {
        self.num_pages
    }

    /// Total number of items in the listing.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Number of items preceding this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of items on this page.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }
}
