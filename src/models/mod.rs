//! Core data models for search requests, raw API records and display pages.

mod page;
mod result;
mod search;

pub use page::{DisplayResult, ResultPage};
pub use result::{RawResult, ResultPacket, ResultsSummary, FILE_TYPE_HTML};
pub use search::{SearchRequest, DEFAULT_LIMIT};
