//! Search service: turns gateway packets into display-ready pages.
//!
//! [`SearchService::try_search`] keeps the failure detail;
//! [`SearchService::search`] collapses every failure into `None` so rendering
//! code only has to handle "page", "empty page" and "nothing".

mod format;

pub use format::{format_file_size_string, format_file_title};

use std::sync::Arc;

use crate::assets::{asset_path_from_url, AssetResolver};
use crate::gateway::{GatewayError, SearchGateway};
use crate::models::{DisplayResult, RawResult, ResultPage, SearchRequest};

/// Errors from a search call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The gateway failed (configuration, network, status or decoding)
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Valid JSON that lacks `results` or `resultsSummary`
    #[error("Malformed search payload: {0}")]
    MalformedPayload(String),
}

impl SearchError {
    /// Whether the failure is a configuration problem rather than a
    /// per-request one
    pub fn is_configuration(&self) -> bool {
        matches!(self, SearchError::Gateway(e) if e.is_configuration())
    }
}

/// Runs searches through a gateway and shapes the results for display
#[derive(Debug, Clone)]
pub struct SearchService {
    gateway: Arc<dyn SearchGateway>,
    assets: Option<Arc<dyn AssetResolver>>,
}

impl SearchService {
    pub fn new(gateway: Arc<dyn SearchGateway>) -> Self {
        Self {
            gateway,
            assets: None,
        }
    }

    /// Use stored file titles for downloadable results
    pub fn with_asset_resolver(mut self, resolver: Arc<dyn AssetResolver>) -> Self {
        self.assets = Some(resolver);
        self
    }

    /// Search and return a page, an empty page for an empty keyword, or
    /// `None` if anything went wrong.
    ///
    /// Configuration errors end up as `None` too; use
    /// [`try_search`](Self::try_search) to tell them apart.
    pub async fn search(&self, request: &SearchRequest) -> Option<ResultPage> {
        match self.try_search(request).await {
            Ok(page) => Some(page),
            Err(e) => {
                tracing::debug!("Search for '{}' returned nothing: {}", request.keyword, e);
                None
            }
        }
    }

    /// Search and return a page or the reason there is none.
    ///
    /// An empty keyword short-circuits to an empty page without calling the
    /// gateway.
    pub async fn try_search(&self, request: &SearchRequest) -> Result<ResultPage, SearchError> {
        if request.is_empty() {
            return Ok(ResultPage::new(Vec::new(), request.start, request.limit, 0));
        }

        let packet = self.gateway.get_results(request).await?;

        let (results, summary) = match (packet.results, packet.results_summary) {
            (Some(results), Some(summary)) => (results, summary),
            (None, _) => {
                return Err(SearchError::MalformedPayload(
                    "missing 'results'".to_string(),
                ))
            }
            (_, None) => {
                return Err(SearchError::MalformedPayload(
                    "missing 'resultsSummary'".to_string(),
                ))
            }
        };

        let mut items = Vec::with_capacity(results.len());
        for raw in results {
            items.push(self.display_result(raw).await);
        }

        Ok(ResultPage::new(
            items,
            request.start,
            request.limit,
            summary.total_matching,
        ))
    }

    async fn display_result(&self, raw: RawResult) -> DisplayResult {
        let title = if raw.is_html() {
            raw.title
        } else {
            let title = self.stored_title(&raw.index_url).await.unwrap_or(raw.title);
            format_file_title(&title, &raw.file_type, raw.file_size)
        };

        DisplayResult {
            link: raw.live_url,
            title,
            summary: raw.summary,
            file_type: raw.file_type,
        }
    }

    async fn stored_title(&self, index_url: &str) -> Option<String> {
        let resolver = self.assets.as_ref()?;
        let path = asset_path_from_url(index_url);
        match resolver.resolve(&path).await {
            Some(file) => Some(file.title),
            None => {
                tracing::debug!("No stored file for '{}', using crawled title", path);
                None
            }
        }
    }
}
