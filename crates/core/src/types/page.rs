//! Pagination arithmetic shared by every listing.
//!
//! All listings use the same contract: a zero-based page index, a non-zero
//! page size, ascending id order, `LIMIT size OFFSET index * size`.

use core::num::NonZeroU32;

/// A zero-based page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    index: u32,
    size: NonZeroU32,
}

impl PageRequest {
    /// Create a page request. A negative index selects the first page.
    #[must_use]
    pub fn new(index: i64, size: NonZeroU32) -> Self {
        let index = u32::try_from(index.max(0)).unwrap_or(u32::MAX);
        Self { index, size }
    }

    /// The first page of the given size.
    #[must_use]
    pub const fn first(size: NonZeroU32) -> Self {
        Self { index: 0, size }
    }

    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    #[must_use]
    pub const fn size(&self) -> NonZeroU32 {
        self.size
    }

    /// Number of items to skip.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.index) * u64::from(self.size.get())
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.size.get())
    }

    /// Select this page out of an already filtered and ordered slice.
    #[must_use]
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let len = usize::try_from(self.limit()).unwrap_or(usize::MAX);
        let Some(rest) = items.get(start..) else {
            return &[];
        };
        rest.get(..len).unwrap_or(rest)
    }
}

/// Number of pages to link for `total` items.
///
/// Zero when everything fits on one page, so no pager is shown.
#[must_use]
pub fn page_count(total: u64, size: NonZeroU32) -> u64 {
    let size = u64::from(size.get());
    if total <= size {
        0
    } else {
        total.div_ceil(size)
    }
}
