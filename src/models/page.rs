//! Display-ready results and the paginated container handed to callers.

use serde::{Deserialize, Serialize};

/// A result shaped for rendering.
///
/// Field names serialize in the PascalCase the page templates expect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisplayResult {
    pub link: String,
    pub title: String,
    pub summary: String,
    pub file_type: String,
}

/// One page of display results plus the totals needed to paginate.
///
/// `total_items` is the API's match count for the whole query, not
/// `items.len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    /// Results in upstream rank order
    pub items: Vec<DisplayResult>,

    /// Offset of the first item
    pub page_start: usize,

    /// Requested page size
    pub page_length: usize,

    /// Total matches across all pages
    pub total_items: u64,
}

impl ResultPage {
    /// Create a page
    pub fn new(
        items: Vec<DisplayResult>,
        page_start: usize,
        page_length: usize,
        total_items: u64,
    ) -> Self {
        Self {
            items,
            page_start,
            page_length,
            total_items,
        }
    }

    /// A page with no items and no totals
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 1-based index of this page
    pub fn current_page(&self) -> usize {
        if self.page_length == 0 {
            return 1;
        }
        self.page_start / self.page_length + 1
    }

    /// Number of pages needed for `total_items`
    pub fn total_pages(&self) -> u64 {
        if self.page_length == 0 {
            return 0;
        }
        self.total_items.div_ceil(self.page_length as u64)
    }
}
