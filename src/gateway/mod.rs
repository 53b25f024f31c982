//! Access to the Funnelback search API.
//!
//! The [`SearchGateway`] trait is the seam between the search service and the
//! network. [`FunnelbackGateway`] is the real HTTP implementation;
//! [`MockGateway`] returns canned packets for tests and offline use.
//!
//! Gateways never swallow errors: every failure is logged at `warn` with its
//! diagnostic context and returned to the caller. Nothing is retried.

mod funnelback;
pub mod mock;

pub use funnelback::{decode_packet, FunnelbackGateway, SEARCH_PATH};
pub use mock::MockGateway;

use async_trait::async_trait;

use crate::config::ConfigError;
use crate::models::{ResultPacket, SearchRequest};

/// Fetches one page of raw results for a request
#[async_trait]
pub trait SearchGateway: Send + Sync + std::fmt::Debug {
    /// Run the request and return the decoded `resultPacket`.
    ///
    /// A response without a result packet yields `ResultPacket::default()`.
    async fn get_results(&self, request: &SearchRequest) -> Result<ResultPacket, GatewayError>;
}

/// Errors that can occur when calling the search API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Required settings are missing or invalid
    #[error("Search gateway is not configured: {0}")]
    Configuration(#[from] ConfigError),

    /// Transport failure or timeout
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a status other than 200
    #[error(
        "Invalid Funnelback response. Code: {status}, Response body: {body}, Request parameters: {}",
        format_params(.params)
    )]
    Upstream {
        status: u16,
        body: String,
        params: Vec<(String, String)>,
    },

    /// The body was not a usable JSON document
    #[error("Invalid JSON response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Whether this error comes from missing or invalid settings
    pub fn is_configuration(&self) -> bool {
        matches!(self, GatewayError::Configuration(_))
    }
}

fn format_params(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={:?}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}
