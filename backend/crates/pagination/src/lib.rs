//! Page-number pagination for listing endpoints.
//!
//! Listings are split into fixed-size pages addressed by a 1-based page
//! number. Out-of-range requests never fail: they clamp to the first or the
//! last page, so a stale `?page=` link still renders a listing.
//!
//! Repositories that can slice at the source ask the [`Paginator`] for a
//! [`PageWindow`] (offset and limit) and wrap the fetched rows with
//! [`Page::new`]. In-memory sequences go through [`Paginator::paginate`].

mod page;
mod paginator;
mod request;

pub use page::Page;
pub use paginator::{PageWindow, PaginationError, Paginator};
pub use request::PageRequest;
