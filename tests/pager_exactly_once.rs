//! Pager Exactly-Once Tests
//!
//! Collecting every hit of an index search through fixed-size windows:
//! - Every hit is visited exactly once, in search order
//! - Hit counts around page boundaries need no special casing
//! - An index that changes mid-walk fails the walk

use crossquery::pager::{IndexSearcher, ResultPager, SearchWindow};

// =============================================================================
// Helper Functions
// =============================================================================

/// Index over hits 0..n; records each window it serves
struct WindowedIndex {
    hits: Vec<u64>,
    windows: Vec<(u64, usize)>,
    generation: u64,
    grow_after_first: bool,
}

impl WindowedIndex {
    fn new(n: u64) -> Self {
        Self {
            hits: (0..n).collect(),
            windows: Vec::new(),
            generation: 1,
            grow_after_first: false,
        }
    }
}

impl IndexSearcher for WindowedIndex {
    type Query = String;
    type Sort = String;
    type Document = u64;
    type Error = String;

    fn search(
        &mut self,
        query: &String,
        sort: Option<&String>,
        offset: u64,
        limit: usize,
    ) -> Result<SearchWindow<u64>, String> {
        if query.is_empty() {
            return Err("empty query".to_string());
        }
        if !self.windows.is_empty() && self.grow_after_first {
            self.hits.push(self.hits.len() as u64);
            self.generation += 1;
        }
        self.windows.push((offset, limit));

        let mut documents: Vec<u64> = self
            .hits
            .iter()
            .skip(offset as usize)
            .take(limit)
            .copied()
            .collect();
        if sort.map_or(false, |s| s == "desc") {
            documents = documents.into_iter().map(|d| 1_000 - d).collect();
        }
        Ok(SearchWindow {
            documents,
            total_hits: self.hits.len() as u64,
            generation: self.generation,
        })
    }
}

const PAGE_SIZE: usize = 5;

fn collect(n: u64) -> (Vec<u64>, Vec<(u64, usize)>) {
    let mut index = WindowedIndex::new(n);
    let hits = ResultPager::new(&mut index, PAGE_SIZE)
        .unwrap()
        .collect_all(&"status:ACTIVE".to_string(), None)
        .unwrap();
    (hits, index.windows)
}

// =============================================================================
// Exactly Once
// =============================================================================

#[test]
fn test_hit_counts_around_page_boundaries() {
    let ps = PAGE_SIZE as u64;
    for n in [0, 1, ps - 1, ps, ps + 1, 2 * ps, 3 * ps - 1] {
        let (hits, windows) = collect(n);
        assert_eq!(hits, (0..n).collect::<Vec<_>>(), "n = {}", n);

        // One window per page, plus the first window when there are no hits
        let expected_windows = std::cmp::max(1, (n + ps - 1) / ps);
        assert_eq!(windows.len() as u64, expected_windows, "n = {}", n);
    }
}

#[test]
fn test_windows_advance_by_hits_consumed() {
    let (_, windows) = collect(12);
    assert_eq!(windows, vec![(0, 5), (5, 5), (10, 5)]);
}

#[test]
fn test_sort_is_passed_through() {
    let mut index = WindowedIndex::new(3);
    let hits = ResultPager::new(&mut index, 2)
        .unwrap()
        .collect_all(&"q".to_string(), Some(&"desc".to_string()))
        .unwrap();
    assert_eq!(hits, vec![1_000, 999, 998]);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_growing_index_fails_walk() {
    let mut index = WindowedIndex::new(8);
    index.grow_after_first = true;

    let err = ResultPager::new(&mut index, 3)
        .unwrap()
        .collect_all(&"q".to_string(), None)
        .unwrap_err();
    assert_eq!(err.code().code(), "CQ_PAGER_SNAPSHOT_CHANGED");
}

#[test]
fn test_search_error_propagates() {
    let mut index = WindowedIndex::new(4);
    let err = ResultPager::new(&mut index, 2)
        .unwrap()
        .collect_all(&String::new(), None)
        .unwrap_err();
    assert_eq!(err.code().code(), "CQ_PAGER_BACKEND_FAILED");
    assert!(err.to_string().contains("empty query"));
}
