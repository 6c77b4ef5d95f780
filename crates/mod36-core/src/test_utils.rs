//! Test doubles for the generation backend
//!
//! Available in this crate's unit tests and, through the `test-utils` feature, to downstream crates.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::backend::{BackendRequest, BackendResponse, GenerationBackend};
use crate::error::BackendError;

/// Backend that replays queued responses and records every request it receives.
///
/// When the queue is empty it answers with the fallback payload if one is set,
/// otherwise with a `BackendError::Configuration`.
#[derive(Debug, Default)]
pub struct StubBackend {
    queued: Mutex<VecDeque<Result<BackendResponse, BackendError>>>,
    fallback: Mutex<Option<Value>>,
    requests: Mutex<Vec<BackendRequest>>,
    calls: AtomicUsize,
}

impl StubBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stub that answers every call with the same payload.
    pub fn always(payload: Value) -> Self {
        let stub = Self::default();
        *stub.fallback.lock() = Some(payload);
        stub
    }

    pub fn push_response(&self, response: BackendResponse) -> &Self {
        self.queued.lock().push_back(Ok(response));
        self
    }

    pub fn push_payload(&self, payload: Value) -> &Self {
        self.push_response(BackendResponse::from_payload(payload))
    }

    pub fn push_text(&self, text: impl Into<String>) -> &Self {
        self.push_response(BackendResponse::from_text(text))
    }

    pub fn push_error(&self, error: BackendError) -> &Self {
        self.queued.lock().push_back(Err(error));
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<BackendRequest> {
        self.requests.lock().clone()
    }

    pub fn last_request(&self) -> Option<BackendRequest> {
        self.requests.lock().last().cloned()
    }
}

#[async_trait]
impl GenerationBackend for StubBackend {
    async fn generate(&self, request: BackendRequest) -> Result<BackendResponse, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request);

        if let Some(next) = self.queued.lock().pop_front() {
            return next;
        }
        match self.fallback.lock().clone() {
            Some(payload) => Ok(BackendResponse::from_payload(payload)),
            None => Err(BackendError::Configuration(
                "StubBackend has no queued response".to_string(),
            )),
        }
    }
}
