//! Page cache adapters.
//!
//! - [`InMemoryPageCache`]: process-wide store with per-entry expiry.
//! - [`NoOpPageCache`]: never stores anything, which disables caching.

mod in_memory;
mod no_op;

pub use in_memory::InMemoryPageCache;
pub use no_op::NoOpPageCache;
