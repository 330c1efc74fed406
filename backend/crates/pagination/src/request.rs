//! Client supplied page selector.

/// Page selector as supplied by a client, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageRequest {
    /// A specific 1-based page number; may be zero, negative or too large.
    Number(i64),
    /// The last available page.
    Last,
}

impl PageRequest {
    /// The first page.
    pub const FIRST: Self = Self::Number(1);

    /// Parse a raw `page` query value.
    ///
    /// Absent or non-numeric values select the first page; the literal
    /// `last` selects the final page.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// assert_eq!(PageRequest::parse(None), PageRequest::FIRST);
    /// assert_eq!(PageRequest::parse(Some("3")), PageRequest::Number(3));
    /// assert_eq!(PageRequest::parse(Some("abc")), PageRequest::FIRST);
    /// assert_eq!(PageRequest::parse(Some("last")), PageRequest::Last);
    /// ```
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("last") => Self::Last,
            Some(value) => value.parse::<i64>().map_or(Self::FIRST, Self::Number),
            None => Self::FIRST,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::FIRST
    }
}

impl From<Option<&str>> for PageRequest {
    fn from(raw: Option<&str>) -> Self {
        Self::parse(raw)
    }
}
