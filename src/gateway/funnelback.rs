//! Funnelback `search.json` gateway.
//!
//! Issues `GET {base}/s/search.json` with HTTP basic auth and
//! `Accept: application/json`, then returns `response.resultPacket`.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use url::Url;

use crate::config::{load_settings, ConfigError, FunnelbackConfig, Settings};
use crate::gateway::{GatewayError, SearchGateway};
use crate::models::{ResultPacket, SearchRequest};
use crate::utils::{HttpClient, DEFAULT_USER_AGENT};

/// Search endpoint, resolved against the host of the base URL
pub const SEARCH_PATH: &str = "/s/search.json";

/// Gateway to a hosted Funnelback instance
#[derive(Debug, Clone)]
pub struct FunnelbackGateway {
    client: HttpClient,
    config: FunnelbackConfig,
    endpoint: Url,
}

impl FunnelbackGateway {
    /// Create a gateway from validated settings
    pub fn new(config: FunnelbackConfig) -> Result<Self, GatewayError> {
        let endpoint = config
            .base_url
            .join(SEARCH_PATH)
            .map_err(|e| ConfigError::InvalidUrl {
                url: config.base_url.to_string(),
                reason: e.to_string(),
            })
            .map_err(|e| logged(e.into()))?;

        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let client = HttpClient::with_options(user_agent, config.timeout).map_err(|e| {
            logged(GatewayError::Network(format!(
                "Failed to create HTTP client: {}",
                e
            )))
        })?;

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Validate raw settings and create a gateway
    pub fn from_settings(settings: Settings) -> Result<Self, GatewayError> {
        let config = settings.validate().map_err(|e| logged(e.into()))?;
        Self::new(config)
    }

    /// Load settings from an optional file plus `FUNNELBACK_*` variables
    pub fn from_config_file(path: Option<&Path>) -> Result<Self, GatewayError> {
        let settings = load_settings(path).map_err(|e| logged(e.into()))?;
        Self::from_settings(settings)
    }

    /// Load settings from `FUNNELBACK_*` variables only
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_config_file(None)
    }

    /// Fully resolved search URL (without query string)
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Settings this gateway was built from
    pub fn config(&self) -> &FunnelbackConfig {
        &self.config
    }

    /// Query parameters for a request, in the order they are sent
    pub fn query_params(&self, request: &SearchRequest) -> Vec<(String, String)> {
        vec![
            ("collection".to_string(), self.config.collection.clone()),
            ("query".to_string(), request.keyword.clone()),
            ("start_rank".to_string(), request.start.to_string()),
            ("num_ranks".to_string(), request.limit.to_string()),
            ("sort".to_string(), request.sort.clone()),
        ]
    }
}

#[async_trait]
impl SearchGateway for FunnelbackGateway {
    async fn get_results(&self, request: &SearchRequest) -> Result<ResultPacket, GatewayError> {
        let params = self.query_params(request);
        tracing::debug!(
            "Querying {} (collection {}, start {}, limit {})",
            self.endpoint,
            self.config.collection,
            request.start,
            request.limit
        );

        let response = self
            .client
            .client()
            .get(self.endpoint.clone())
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(ACCEPT, "application/json")
            .query(&params)
            .send()
            .await
            .map_err(|e| logged(network_error(e, &self.config)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| logged(network_error(e, &self.config)))?;

        if status != StatusCode::OK {
            return Err(logged(GatewayError::Upstream {
                status: status.as_u16(),
                body,
                params,
            }));
        }

        decode_packet(&body).map_err(logged)
    }
}

/// Decode a `search.json` body into its result packet.
///
/// JSON `null` is rejected like any other undecodable body. A missing or
/// null `response.resultPacket` is the API's way of saying "no results".
pub fn decode_packet(body: &str) -> Result<ResultPacket, GatewayError> {
    let decoded: Value = serde_json::from_str(body)
        .map_err(|e| GatewayError::Decode(format!("{} ({})", body, e)))?;

    if decoded.is_null() {
        return Err(GatewayError::Decode(body.to_string()));
    }

    match decoded.pointer("/response/resultPacket") {
        None | Some(Value::Null) => Ok(ResultPacket::default()),
        Some(packet) => ResultPacket::deserialize(packet).map_err(|e| {
            GatewayError::Decode(format!("unexpected resultPacket shape ({})", e))
        }),
    }
}

fn network_error(err: reqwest::Error, config: &FunnelbackConfig) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Network(format!(
            "Request timed out after {}s",
            config.timeout.as_secs_f32()
        ))
    } else {
        GatewayError::Network(err.to_string())
    }
}

fn logged(err: GatewayError) -> GatewayError {
    tracing::warn!("Funnelback search failed: {}", err);
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    const PACKET_BODY: &str = r#"{
        "question": {"query": "rates"},
        "response": {
            "resultPacket": {
                "results": [
                    {
                        "fileType": "html",
                        "title": "Rates",
                        "fileSize": 2048,
                        "indexUrl": "https://example.govt.nz/rates",
                        "liveUrl": "https://example.govt.nz/rates",
                        "summary": "Pay your rates"
                    }
                ],
                "resultsSummary": {"totalMatching": 7}
            }
        }
    }"#;

    fn gateway_for(url: &str) -> FunnelbackGateway {
        let config = FunnelbackConfig::new(url, "user", "secret", "example-web").unwrap();
        FunnelbackGateway::new(config).unwrap()
    }

    #[test]
    fn test_endpoint_replaces_base_path() {
        let gateway = gateway_for("https://search.example.com/some/base/");
        assert_eq!(
            gateway.endpoint().as_str(),
            "https://search.example.com/s/search.json"
        );
    }

    #[test]
    fn test_query_params_order() {
        let gateway = gateway_for("https://search.example.com");
        let request = SearchRequest::new("rates").start(10).limit(5);
        let keys: Vec<String> = gateway
            .query_params(&request)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec!["collection", "query", "start_rank", "num_ranks", "sort"]
        );
    }

    #[test]
    fn test_from_settings_fails_fast() {
        let result = FunnelbackGateway::from_settings(Settings {
            url: Some("https://search.example.com".to_string()),
            ..Default::default()
        });
        assert_eq!(
            result.unwrap_err(),
            GatewayError::Configuration(ConfigError::Missing("username"))
        );
    }

    #[test]
    fn test_decode_packet_missing_packet() {
        let packet = decode_packet(r#"{"response": {}}"#).unwrap();
        assert_eq!(packet, ResultPacket::default());

        let packet = decode_packet(r#"{"response": {"resultPacket": null}}"#).unwrap();
        assert_eq!(packet, ResultPacket::default());
    }

    #[test]
    fn test_decode_packet_rejects_bad_json() {
        assert!(matches!(
            decode_packet("<html>oops</html>"),
            Err(GatewayError::Decode(_))
        ));
        assert!(matches!(decode_packet("null"), Err(GatewayError::Decode(_))));
        assert!(matches!(
            decode_packet(r#"{"response": {"resultPacket": {"results": "nope"}}}"#),
            Err(GatewayError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_get_results_sends_expected_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/s/search.json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("collection".into(), "example-web".into()),
                Matcher::UrlEncoded("query".into(), "rates notice".into()),
                Matcher::UrlEncoded("start_rank".into(), "20".into()),
                Matcher::UrlEncoded("num_ranks".into(), "10".into()),
                Matcher::UrlEncoded("sort".into(), "date".into()),
            ]))
            .match_header("accept", "application/json")
            // base64("user:secret")
            .match_header("authorization", "Basic dXNlcjpzZWNyZXQ=")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PACKET_BODY)
            .create_async()
            .await;

        let gateway = gateway_for(&server.url());
        let request = SearchRequest::new("rates notice").start(20).sort("date");
        let packet = gateway.get_results(&request).await.unwrap();

        mock.assert_async().await;
        let results = packet.results.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Rates");
        assert_eq!(packet.results_summary.unwrap().total_matching, 7);
    }

    #[tokio::test]
    async fn test_get_results_non_200() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/s/search.json")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("Internal error")
            .create_async()
            .await;

        let gateway = gateway_for(&server.url());
        let err = gateway
            .get_results(&SearchRequest::new("rates"))
            .await
            .unwrap_err();

        match err {
            GatewayError::Upstream {
                status,
                body,
                params,
            } => {
                assert_eq!(status, 500);
                assert_eq!(body, "Internal error");
                assert!(params.contains(&("query".to_string(), "rates".to_string())));
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_results_non_200_success_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/s/search.json")
            .match_query(Matcher::Any)
            .with_status(204)
            .create_async()
            .await;

        let gateway = gateway_for(&server.url());
        let err = gateway
            .get_results(&SearchRequest::new("rates"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Upstream { status: 204, .. }));
    }

    #[tokio::test]
    async fn test_get_results_invalid_json() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/s/search.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let gateway = gateway_for(&server.url());
        let err = gateway
            .get_results(&SearchRequest::new("rates"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn test_get_results_without_packet() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/s/search.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"response": {}}"#)
            .create_async()
            .await;

        let gateway = gateway_for(&server.url());
        let packet = gateway
            .get_results(&SearchRequest::new("rates"))
            .await
            .unwrap();
        assert_eq!(packet, ResultPacket::default());
    }

    #[tokio::test]
    async fn test_get_results_unreachable_host() {
        // Port 9 (discard) on localhost is closed on test machines
        let config = FunnelbackConfig::new("http://127.0.0.1:9", "user", "secret", "web")
            .unwrap()
            .with_timeout(Duration::from_secs(2));
        let gateway = FunnelbackGateway::new(config).unwrap();

        let err = gateway
            .get_results(&SearchRequest::new("rates"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_failures_are_logged_at_warn() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut server = Server::new_async().await;
        let _down = server
            .mock("GET", "/s/search.json")
            .match_query(Matcher::UrlEncoded("query".into(), "rates".into()))
            .with_status(503)
            .with_body("down")
            .create_async()
            .await;
        let _garbled = server
            .mock("GET", "/s/search.json")
            .match_query(Matcher::UrlEncoded("query".into(), "levy".into()))
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let gateway = gateway_for(&server.url());
        assert!(gateway.get_results(&SearchRequest::new("rates")).await.is_err());
        assert!(gateway.get_results(&SearchRequest::new("levy")).await.is_err());

        let config = FunnelbackConfig::new("http://127.0.0.1:9", "user", "secret", "web")
            .unwrap()
            .with_timeout(Duration::from_secs(2));
        let offline = FunnelbackGateway::new(config).unwrap();
        assert!(offline.get_results(&SearchRequest::new("rates")).await.is_err());

        let output = logs.contents();
        assert_eq!(output.matches("Funnelback search failed").count(), 3, "{}", output);
        assert!(output.contains("WARN"));
        assert!(output.contains("Code: 503"));
        assert!(output.contains("Response body: down"));
        assert!(output.contains("collection=\"example-web\""));
        assert!(output.contains("query=\"rates\""));
        assert!(output.contains("Invalid JSON response"));
        assert!(output.contains("Network error"));
    }
}
