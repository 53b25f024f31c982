//! Records returned by the Funnelback search API.
//!
//! These mirror the `response.resultPacket` object of `search.json`. Decoding is
//! lenient: the API sends `null` for missing strings and reports `fileSize`
//! either as a number or as a decimal string.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// File type Funnelback reports for web pages.
pub const FILE_TYPE_HTML: &str = "html";

/// A single result record as sent by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_type: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Size in bytes
    #[serde(default, deserialize_with = "lenient_file_size")]
    pub file_size: u64,

    /// URL the crawler indexed
    #[serde(default, deserialize_with = "null_as_default")]
    pub index_url: String,

    /// Public URL shown to users
    #[serde(default, deserialize_with = "null_as_default")]
    pub live_url: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
}

impl RawResult {
    /// Whether this result is a web page rather than a downloadable file
    pub fn is_html(&self) -> bool {
        self.file_type == FILE_TYPE_HTML
    }
}

/// Count metadata for the whole result set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    /// Matches across all pages
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_matching: u64,
}

/// The `resultPacket` object of a successful response.
///
/// Both fields are optional on the wire; an absent packet decodes to
/// `ResultPacket::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPacket {
    #[serde(default)]
    pub results: Option<Vec<RawResult>>,

    #[serde(default)]
    pub results_summary: Option<ResultsSummary>,
}

impl ResultPacket {
    /// Build a packet holding one page of results
    pub fn new(results: Vec<RawResult>, total_matching: u64) -> Self {
        Self {
            results: Some(results),
            results_summary: Some(ResultsSummary { total_matching }),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_file_size<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let size = match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    };
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_result_record() {
        let json = r#"{
            "fileType": "pdf",
            "title": "Annual Report",
            "fileSize": 62162,
            "indexUrl": "https://example.govt.nz/assets/Reports/annual.pdf",
            "liveUrl": "https://example.govt.nz/assets/Reports/annual.pdf",
            "summary": "The annual report",
            "rank": 1
        }"#;

        let result: RawResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.file_type, "pdf");
        assert_eq!(result.title, "Annual Report");
        assert_eq!(result.file_size, 62162);
        assert_eq!(result.summary, "The annual report");
        assert!(!result.is_html());
    }

    #[test]
    fn test_file_size_as_string() {
        let result: RawResult = serde_json::from_str(r#"{"fileSize": "1048576"}"#).unwrap();
        assert_eq!(result.file_size, 1_048_576);
    }

    #[test]
    fn test_file_size_garbage_is_zero() {
        let result: RawResult = serde_json::from_str(r#"{"fileSize": "big"}"#).unwrap();
        assert_eq!(result.file_size, 0);

        let result: RawResult = serde_json::from_str(r#"{"fileSize": null}"#).unwrap();
        assert_eq!(result.file_size, 0);

        let result: RawResult = serde_json::from_str(r#"{"fileSize": -5}"#).unwrap();
        assert_eq!(result.file_size, 0);
    }

    #[test]
    fn test_null_strings_are_empty() {
        let result: RawResult =
            serde_json::from_str(r#"{"fileType": "html", "title": "Home", "summary": null}"#)
                .unwrap();
        assert!(result.is_html());
        assert_eq!(result.summary, "");
        assert_eq!(result.live_url, "");
    }

    #[test]
    fn test_decode_packet() {
        let json = r#"{
            "results": [{"fileType": "html", "title": "Home"}],
            "resultsSummary": {"totalMatching": 42, "currStart": 1}
        }"#;

        let packet: ResultPacket = serde_json::from_str(json).unwrap();
        assert_eq!(packet.results.as_ref().map(Vec::len), Some(1));
        assert_eq!(packet.results_summary.map(|s| s.total_matching), Some(42));
    }

    #[test]
    fn test_null_total_matching_is_zero() {
        let json = r#"{"results": [], "resultsSummary": {"totalMatching": null}}"#;

        let packet: ResultPacket = serde_json::from_str(json).unwrap();
        assert_eq!(packet.results, Some(Vec::new()));
        assert_eq!(packet.results_summary, Some(ResultsSummary { total_matching: 0 }));
    }

    #[test]
    fn test_decode_empty_packet() {
        let packet: ResultPacket = serde_json::from_str("{}").unwrap();
        assert_eq!(packet, ResultPacket::default());
        assert!(packet.results.is_none());
        assert!(packet.results_summary.is_none());
    }
}
