//! Domain cache key type shared by page cache adapters.
use thiserror::Error;

/// Key under which a rendered page is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Construct a cache key after validating that it is non-empty and trimmed.
    ///
    /// # Examples
    /// ```
    /// use yatube::domain::ports::CacheKey;
    ///
    /// let key = CacheKey::new("index_page").expect("valid key");
    /// assert_eq!(key.as_str(), "index_page");
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, CacheKeyValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(CacheKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(CacheKeyValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying key as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation errors returned when constructing [`CacheKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheKeyValidationError {
    /// Key is empty after trimming whitespace.
    #[error("cache key must not be empty")]
    Empty,
    /// Key contains leading or trailing whitespace.
    #[error("cache key must not contain surrounding whitespace")]
    ContainsWhitespace,
}
