//! Result pager
//!
//! Walks an index search window by window until every hit has been
//! visited once. The offset advances by the hits actually consumed, and
//! the walk ends when it reaches the total the first window reported.

use std::fmt;

use crate::observability::{log_event, Event};

use super::errors::{PagerError, PagerResult};

/// One window of search hits
#[derive(Debug, Clone, PartialEq)]
pub struct SearchWindow<D> {
    pub documents: Vec<D>,
    /// Hits matching the query across all windows
    pub total_hits: u64,
    /// Identifies the index snapshot the window was read from
    pub generation: u64,
}

/// Native paged search over an index
pub trait IndexSearcher {
    type Query;
    type Sort;
    type Document;
    type Error: fmt::Display;

    /// Returns at most `limit` hits starting at `offset`
    fn search(
        &mut self,
        query: &Self::Query,
        sort: Option<&Self::Sort>,
        offset: u64,
        limit: usize,
    ) -> Result<SearchWindow<Self::Document>, Self::Error>;
}

/// Collects every hit of a query, one window at a time
pub struct ResultPager<'a, S: IndexSearcher> {
    searcher: &'a mut S,
    page_size: usize,
}

impl<'a, S: IndexSearcher> ResultPager<'a, S> {
    /// Creates a pager reading `page_size` hits per window
    pub fn new(searcher: &'a mut S, page_size: usize) -> PagerResult<Self> {
        if page_size == 0 {
            return Err(PagerError::invalid_page_size());
        }
        Ok(Self {
            searcher,
            page_size,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Every hit of `query`, in index order
    pub fn collect_all(
        &mut self,
        query: &S::Query,
        sort: Option<&S::Sort>,
    ) -> PagerResult<Vec<S::Document>> {
        let mut documents = Vec::new();
        self.walk(query, sort, |doc| {
            documents.push(doc);
            Ok::<(), PagerError>(())
        })?;
        Ok(documents)
    }

    /// Every hit of `query`, mapped through `transform`.
    ///
    /// The first failing transform stops the walk.
    pub fn collect_all_with<T, F>(
        &mut self,
        query: &S::Query,
        sort: Option<&S::Sort>,
        mut transform: F,
    ) -> crate::Result<Vec<T>>
    where
        F: FnMut(S::Document) -> crate::Result<T>,
    {
        let mut items = Vec::new();
        self.walk(query, sort, |doc| -> crate::Result<()> {
            items.push(transform(doc)?);
            Ok(())
        })?;
        Ok(items)
    }

    fn walk<E, F>(&mut self, query: &S::Query, sort: Option<&S::Sort>, mut visit: F) -> Result<(), E>
    where
        E: From<PagerError>,
        F: FnMut(S::Document) -> Result<(), E>,
    {
        let mut offset = 0u64;
        let mut snapshot: Option<(u64, u64)> = None;

        loop {
            let window = self
                .searcher
                .search(query, sort, offset, self.page_size)
                .map_err(|e| PagerError::backend_failed(offset, e))?;

            let (total, generation) =
                *snapshot.get_or_insert((window.total_hits, window.generation));
            if window.generation != generation {
                return Err(PagerError::snapshot_changed(offset, generation, window.generation).into());
            }

            let remaining = total.saturating_sub(offset);
            if remaining == 0 {
                return Ok(());
            }
            if window.documents.is_empty() {
                return Err(PagerError::empty_window(offset, total).into());
            }

            let consumed = window.documents.len().min(remaining as usize);
            let offset_str = offset.to_string();
            let consumed_str = consumed.to_string();
            log_event(
                Event::IndexWindowFetched,
                &[("offset", offset_str.as_str()), ("hits", consumed_str.as_str())],
            );

            for doc in window.documents.into_iter().take(consumed) {
                visit(doc)?;
            }
            offset += consumed as u64;

            if offset >= total {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    /// Index over numbered documents; `query` is unused
    struct NumberIndex {
        hits: Vec<u32>,
        generation: u64,
        bump_generation_after: Option<usize>,
        short_windows: bool,
        calls: usize,
    }

    impl NumberIndex {
        fn new(n: u32) -> Self {
            Self {
                hits: (0..n).collect(),
                generation: 1,
                bump_generation_after: None,
                short_windows: false,
                calls: 0,
            }
        }
    }

    impl IndexSearcher for NumberIndex {
        type Query = ();
        type Sort = ();
        type Document = u32;
        type Error = String;

        fn search(
            &mut self,
            _: &(),
            _: Option<&()>,
            offset: u64,
            limit: usize,
        ) -> Result<SearchWindow<u32>, String> {
            self.calls += 1;
            if Some(self.calls) == self.bump_generation_after.map(|n| n + 1) {
                self.generation += 1;
            }
            // Short windows return one hit less than asked for
            let limit = if self.short_windows && limit > 1 { limit - 1 } else { limit };
            Ok(SearchWindow {
                documents: self
                    .hits
                    .iter()
                    .skip(offset as usize)
                    .take(limit)
                    .copied()
                    .collect(),
                total_hits: self.hits.len() as u64,
                generation: self.generation,
            })
        }
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut index = NumberIndex::new(3);
        assert!(ResultPager::new(&mut index, 0).is_err());
    }

    #[test]
    fn test_short_windows_still_visit_everything() {
        let mut index = NumberIndex::new(10);
        index.short_windows = true;
        let mut pager = ResultPager::new(&mut index, 4).unwrap();
        assert_eq!(pager.collect_all(&(), None).unwrap(), (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_generation_change_is_fatal() {
        let mut index = NumberIndex::new(10);
        index.bump_generation_after = Some(1);
        let mut pager = ResultPager::new(&mut index, 4).unwrap();

        let err = pager.collect_all(&(), None).unwrap_err();
        assert_eq!(err.code().code(), "CQ_PAGER_SNAPSHOT_CHANGED");
        assert_eq!(err.offset(), Some(4));
    }

    #[test]
    fn test_collect_all_with_transform() {
        let mut index = NumberIndex::new(5);
        let mut pager = ResultPager::new(&mut index, 2).unwrap();

        let items = pager
            .collect_all_with(&(), None, |n| Ok(format!("doc-{}", n)))
            .unwrap();
        assert_eq!(items, vec!["doc-0", "doc-1", "doc-2", "doc-3", "doc-4"]);
    }

    #[test]
    fn test_transform_error_stops_walk() {
        let mut index = NumberIndex::new(6);
        let mut pager = ResultPager::new(&mut index, 2).unwrap();

        let err = pager
            .collect_all_with(&(), None, |n| {
                if n == 3 {
                    Err(Error::from(PagerError::empty_window(3, 6)))
                } else {
                    Ok(n)
                }
            })
            .unwrap_err();
        assert_eq!(err.code(), "CQ_PAGER_EMPTY_WINDOW");
        assert_eq!(index.calls, 2);
    }
}
