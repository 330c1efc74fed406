//! Slug validation predicates for group URLs.
//!
//! Slugs are trimmed, non-empty identifiers composed of ASCII letters,
//! digits, hyphens and underscores.

/// Maximum slug length stored for a group.
pub const SLUG_MAX: usize = 50;

/// Return `true` when `value` is a valid group slug.
pub(crate) fn is_valid_slug(value: &str) -> bool {
    is_trimmed_non_empty(value) && value.len() <= SLUG_MAX && has_allowed_slug_chars(value)
}

fn is_trimmed_non_empty(value: &str) -> bool {
    !value.is_empty() && value.trim() == value
}

fn has_allowed_slug_chars(value: &str) -> bool {
    value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}
