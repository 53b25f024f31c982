//! Search request model.

use serde::{Deserialize, Serialize};

/// Default page size when the caller does not pick one.
pub const DEFAULT_LIMIT: usize = 10;

/// Parameters for a single search call.
///
/// `start` and `limit` map onto Funnelback's `start_rank` and `num_ranks`.
/// An empty `sort` asks the API for its default relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Keyword(s) entered by the user
    pub keyword: String,

    /// Offset of the first result
    pub start: usize,

    /// Page size
    pub limit: usize,

    /// API-defined sort key
    pub sort: String,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            start: 0,
            limit: DEFAULT_LIMIT,
            sort: String::new(),
        }
    }
}

impl SearchRequest {
    /// Create a new request for the first page of `keyword`
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Default::default()
        }
    }

    /// Set the result offset
    pub fn start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    /// Set the page size
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Set the sort key
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    /// Whether there is anything to search for
    pub fn is_empty(&self) -> bool {
        self.keyword.is_empty()
    }
}
