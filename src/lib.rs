//! # Funnelback Search
//!
//! Client for the Funnelback hosted search API that forwards keyword queries,
//! paginates results and formats them for display.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (SearchRequest, RawResult, ResultPage, etc.)
//! - [`gateway`]: The [`SearchGateway`] trait and its HTTP and mock implementations
//! - [`service`]: [`SearchService`] and the title/file size formatting
//! - [`assets`]: Optional lookup of stored file titles
//! - [`config`]: Configuration management
//! - [`utils`]: HTTP client construction
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use funnelback_search::{FunnelbackGateway, SearchRequest, SearchService};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = FunnelbackGateway::from_env()?;
//! let service = SearchService::new(Arc::new(gateway));
//!
//! match service.search(&SearchRequest::new("rates").limit(20)).await {
//!     Some(page) => println!("{} of {} results", page.len(), page.total_items),
//!     None => println!("Search is unavailable"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod config;
pub mod gateway;
pub mod models;
pub mod service;
pub mod utils;

// Re-export commonly used types
pub use gateway::{FunnelbackGateway, GatewayError, SearchGateway};
pub use models::{DisplayResult, ResultPage, SearchRequest};
pub use service::{SearchError, SearchService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
