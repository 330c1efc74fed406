//! Yatube: a social blogging service with posts, topic groups, comments and
//! author follows.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::Trace;
