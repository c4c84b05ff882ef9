//! Offset pagination primitives shared by backend listing endpoints.
//!
//! Listing endpoints accept loosely typed `limit` and `offset` query values
//! and must never fail because of them. [`PageRequest`] normalizes whatever
//! the caller sent into a usable window, and [`Page`] carries one window of
//! results together with the total row count.
//!
//! Normalization rules:
//!
//! - a page size with no numeric value falls back to [`DEFAULT_LIMIT`];
//! - a page size below [`MIN_LIMIT`] is raised to it;
//! - a missing or negative offset becomes zero;
//! - page sizes have no upper bound.
//!
//! # Examples
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::from_query(Some("-10"), Some("-5"));
//! assert_eq!(request, PageRequest::new(Some(1), Some(0)));
//!
//! let page = Page::new(vec!["a"], 3, request);
//! assert!(page.has_more());
//! ```

use serde::Serialize;

/// Page size used when the caller supplies no numeric value.
pub const DEFAULT_LIMIT: u64 = 50;

/// Smallest page size a caller can request.
pub const MIN_LIMIT: u64 = 1;

/// Normalized offset window for a listing query.
///
/// ## Invariants
/// - `limit >= MIN_LIMIT`.
/// - `limit` and `offset` both fit in `i64`, so they can be bound to SQL
///   `LIMIT`/`OFFSET` parameters without loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    limit: u64,
    offset: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl PageRequest {
    /// Build a request from already-parsed values, applying the clamp rules.
    ///
    /// ```
    /// use pagination::{DEFAULT_LIMIT, PageRequest};
    ///
    /// let request = PageRequest::new(None, Some(-3));
    /// assert_eq!(request.limit(), DEFAULT_LIMIT);
    /// assert_eq!(request.offset(), 0);
    /// ```
    #[must_use]
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = limit.map_or(DEFAULT_LIMIT, |value| value.max(1).unsigned_abs());
        let offset = offset.map_or(0, |value| value.max(0).unsigned_abs());
        Self { limit, offset }
    }

    /// Build a request from raw query-string values.
    ///
    /// Values are read leniently with [`parse_leading_integer`]; anything
    /// without a leading number counts as absent.
    #[must_use]
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        Self::new(
            limit.and_then(parse_leading_integer),
            offset.and_then(parse_leading_integer),
        )
    }

    /// Maximum number of rows in the page.
    #[must_use]
    pub const fn limit(self) -> u64 {
        self.limit
    }

    /// Number of rows skipped before the page starts.
    #[must_use]
    pub const fn offset(self) -> u64 {
        self.offset
    }

    /// Limit converted for SQL binding.
    #[must_use]
    pub fn sql_limit(self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }

    /// Offset converted for SQL binding.
    #[must_use]
    pub fn sql_offset(self) -> i64 {
        i64::try_from(self.offset).unwrap_or(i64::MAX)
    }

    /// Whether rows remain after this window given `total` matching rows.
    #[must_use]
    pub const fn has_more(self, total: u64) -> bool {
        self.offset.saturating_add(self.limit) < total
    }
}

/// Parse the leading integer of `raw`, ignoring trailing characters.
///
/// Leading whitespace and a single `+`/`-` sign are accepted. Values beyond
/// the `i64` range saturate. Returns `None` when no digit follows the
/// optional sign.
///
/// ```
/// use pagination::parse_leading_integer;
///
/// assert_eq!(parse_leading_integer(" 25rows"), Some(25));
/// assert_eq!(parse_leading_integer("-4"), Some(-4));
/// assert_eq!(parse_leading_integer("abc"), None);
/// ```
#[must_use]
pub fn parse_leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(10) else {
            break;
        };
        seen_digit = true;
        let digit = i64::from(digit);
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }

    seen_digit.then_some(value)
}

/// One window of listing results plus the data needed to request the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    limit: u64,
    offset: u64,
    has_more: bool,
}

impl<T> Page<T> {
    /// Assemble a page from the fetched rows and the total match count.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            limit: request.limit(),
            offset: request.offset(),
            has_more: request.has_more(total),
        }
    }

    /// Rows in this window.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its rows.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Total rows matching the listing, across all windows.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Effective page size.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.limit
    }

    /// Effective offset.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// True when `offset + limit < total`.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Convert every row while keeping the window metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            limit: self.limit,
            offset: self.offset,
            has_more: self.has_more,
        }
    }
}
