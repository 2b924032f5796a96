//! Page-number pagination primitives shared by feed endpoints.
//!
//! Listings are sliced into fixed-size, 1-indexed pages. Requests for pages
//! outside the valid range are clamped to the nearest valid page rather than
//! rejected: page 0 becomes page 1, and a page beyond the last becomes the
//! last page. Non-numeric page query parameters fall back to page 1 via
//! [`PageNumber::parse`].

use serde::{Deserialize, Serialize};

/// Number of items served per feed page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Errors raised while computing page bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// A page size of zero can never hold any item.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// Requested page number, parsed leniently from query input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNumber(u64);

impl PageNumber {
    /// First page.
    pub const FIRST: Self = Self(1);

    /// Parse an optional query parameter into a page number.
    ///
    /// Absent or non-numeric input falls back to page 1. A parsed zero is
    /// kept as-is; clamping resolves it to the first page.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(value) => value.trim().parse::<u64>().map_or(Self::FIRST, Self),
            None => Self::FIRST,
        }
    }

    /// The raw requested page number.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

impl From<u64> for PageNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Clamped page coordinates used to slice an ordered listing.
///
/// Produced by [`PageBounds::clamp`] from a total item count and a requested
/// page; repositories translate `offset`/`limit` into query bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBounds {
    /// Effective 1-indexed page number after clamping.
    pub number: u64,
    /// Number of items to skip before the page starts.
    pub offset: u64,
    /// Maximum number of items on the page.
    pub limit: u64,
    /// Total number of pages; at least 1 even for an empty listing.
    pub total_pages: u64,
}

impl PageBounds {
    /// Clamp `requested` into the valid page range for `total_items`.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::ZeroPageSize`] when `page_size` is zero.
    pub fn clamp(
        total_items: u64,
        page_size: u64,
        requested: PageNumber,
    ) -> Result<Self, PaginationError> {
        if page_size == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        let total_pages = total_items.div_ceil(page_size).max(1);
        let number = requested.get().clamp(1, total_pages);
        Ok(Self {
            number,
            offset: (number - 1) * page_size,
            limit: page_size,
            total_pages,
        })
    }
}

/// A bounded slice of an ordered listing plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in listing order.
    pub items: Vec<T>,
    /// Effective 1-indexed page number.
    pub number: u64,
    /// Configured page size.
    pub page_size: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page from an already-sliced window of items.
    ///
    /// `items` must be the slice described by `bounds`; `total_items` is the
    /// size of the full listing the slice was taken from.
    #[must_use]
    pub fn from_window(items: Vec<T>, bounds: PageBounds, total_items: u64) -> Self {
        Self {
            items,
            number: bounds.number,
            page_size: bounds.limit,
            total_items,
            total_pages: bounds.total_pages,
        }
    }

    /// Map page items while keeping the envelope metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Slice an in-memory ordered listing into the requested page.
///
/// # Errors
///
/// Returns [`PaginationError::ZeroPageSize`] when `page_size` is zero.
pub fn paginate<T>(
    items: Vec<T>,
    page_size: u64,
    requested: PageNumber,
) -> Result<Page<T>, PaginationError> {
    let total_items = items.len() as u64;
    let bounds = PageBounds::clamp(total_items, page_size, requested)?;
    let window = items
        .into_iter()
        .skip(usize::try_from(bounds.offset).unwrap_or(usize::MAX))
        .take(usize::try_from(bounds.limit).unwrap_or(usize::MAX))
        .collect();
    Ok(Page::from_window(window, bounds, total_items))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 1)]
    #[case(Some("3"), 3)]
    #[case(Some(" 2 "), 2)]
    #[case(Some("abc"), 1)]
    #[case(Some("-1"), 1)]
    #[case(Some(""), 1)]
    fn parse_is_lenient(#[case] raw: Option<&str>, #[case] expected: u64) {
        assert_eq!(PageNumber::parse(raw).get(), expected);
    }

    #[rstest]
    #[case(11, 10, 1, 1, 0, 2)]
    #[case(11, 10, 2, 2, 10, 2)]
    #[case(11, 10, 9, 2, 10, 2)]
    #[case(11, 10, 0, 1, 0, 2)]
    #[case(0, 10, 5, 1, 0, 1)]
    fn clamp_resolves_to_nearest_valid_page(
        #[case] total: u64,
        #[case] size: u64,
        #[case] requested: u64,
        #[case] number: u64,
        #[case] offset: u64,
        #[case] total_pages: u64,
    ) {
        let bounds = PageBounds::clamp(total, size, PageNumber::from(requested))
            .expect("non-zero page size");
        assert_eq!(bounds.number, number);
        assert_eq!(bounds.offset, offset);
        assert_eq!(bounds.total_pages, total_pages);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert_eq!(
            PageBounds::clamp(10, 0, PageNumber::FIRST),
            Err(PaginationError::ZeroPageSize)
        );
    }

    #[test]
    fn paginate_slices_first_and_last_pages() {
        let items: Vec<u32> = (0..11).collect();
        let first = paginate(items.clone(), 10, PageNumber::from(1)).expect("page");
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total_items, 11);
        assert_eq!(first.total_pages, 2);

        let last = paginate(items, 10, PageNumber::from(99)).expect("page");
        assert_eq!(last.number, 2);
        assert_eq!(last.items, vec![10]);
    }

    #[test]
    fn map_preserves_envelope() {
        let page = paginate(vec![1, 2, 3], 2, PageNumber::FIRST).expect("page");
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.total_items, 3);
        assert_eq!(mapped.total_pages, 2);
    }
}
