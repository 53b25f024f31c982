//! Utility modules shared by the gateway and CLI.
//!
//! - [`HttpClient`]: reqwest client with a user agent and timeouts applied

mod http;

pub use http::{HttpClient, DEFAULT_USER_AGENT};
