//! Result types for paged queries

/// One page of results.
///
/// Items are produced lazily: the row transform runs only as the page is
/// iterated.
#[derive(Debug)]
pub struct PagedResults<I> {
    /// Rows matching the filter across all pages
    total: u64,
    /// Zero-based row this page starts at
    first_row: u64,
    page_size: usize,
    items: I,
}

impl<I: Iterator> PagedResults<I> {
    pub(crate) fn new(total: u64, first_row: u64, page_size: usize, items: I) -> Self {
        Self {
            total,
            first_row,
            page_size,
            items,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn first_row(&self) -> u64 {
        self.first_row
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns true if rows exist beyond this page
    pub fn has_more(&self) -> bool {
        self.first_row.saturating_add(self.page_size as u64) < self.total
    }

    /// Consumes the page, returning its item iterator
    pub fn into_items(self) -> I {
        self.items
    }
}

impl<I: Iterator> IntoIterator for PagedResults<I> {
    type Item = I::Item;
    type IntoIter = I;

    fn into_iter(self) -> I {
        self.items
    }
}
