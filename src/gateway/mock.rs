//! Mock gateway for testing purposes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::gateway::{GatewayError, SearchGateway};
use crate::models::{RawResult, ResultPacket, SearchRequest};

/// A gateway that returns a predefined packet or error and records calls.
#[derive(Debug)]
pub struct MockGateway {
    reply: Mutex<Result<ResultPacket, GatewayError>>,
    last_request: Mutex<Option<SearchRequest>>,
    calls: AtomicUsize,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    /// Create a mock that answers with an empty packet.
    pub fn new() -> Self {
        Self {
            reply: Mutex::new(Ok(ResultPacket::default())),
            last_request: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock that answers with `packet`.
    pub fn with_packet(packet: ResultPacket) -> Self {
        let mock = Self::new();
        mock.set_packet(packet);
        mock
    }

    /// Create a mock that fails with `error`.
    pub fn with_error(error: GatewayError) -> Self {
        let mock = Self::new();
        mock.set_error(error);
        mock
    }

    /// Set the packet to return.
    pub fn set_packet(&self, packet: ResultPacket) {
        *lock(&self.reply) = Ok(packet);
    }

    /// Set the error to return.
    pub fn set_error(&self, error: GatewayError) {
        *lock(&self.reply) = Err(error);
    }

    /// Number of times `get_results` was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<SearchRequest> {
        lock(&self.last_request).clone()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl SearchGateway for MockGateway {
    async fn get_results(&self, request: &SearchRequest) -> Result<ResultPacket, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *lock(&self.last_request) = Some(request.clone());
        lock(&self.reply).clone()
    }
}

/// Helper function to create a raw result for testing.
pub fn make_result(file_type: &str, title: &str, file_size: u64) -> RawResult {
    let slug = title.trim().to_lowercase().replace(' ', "-");
    let url = if file_type == "html" {
        format!("https://example.govt.nz/{}", slug)
    } else {
        format!("https://example.govt.nz/assets/Uploads/{}.{}", slug, file_type)
    };

    RawResult {
        file_type: file_type.to_string(),
        title: title.to_string(),
        file_size,
        index_url: url.clone(),
        live_url: url,
        summary: format!("Summary of {}", title.trim()),
    }
}
