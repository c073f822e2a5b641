//! # Mock Transports
//!
//! Utilities for testing clients, services and controllers without a server.
//!
//! Two styles are available:
//!
//! - [`MockTransport`]: queue expectations up front with a fluent API, run the
//!   code under test, then [`verify`](MockTransport::verify).
//! - [`create_mock_transport`]: get a transport plus a receiver. Pull requests
//!   off the receiver with [`expect_request`] and answer them whenever (and in
//!   whatever order) the test wants. Use this to control resolution order.
//!
//! ```ignore
//! let mut mock = MockTransport::new();
//! mock.expect_get("forums").return_json(200, json!([]));
//!
//! let executor = RequestExecutor::new(mock.transport());
//! // Use executor in tests...
//! mock.verify(); // Ensures all expectations were met
//! ```

use super::error::TransportFailure;
use super::transport::{Method, Transport, TransportRequest, TransportResponse};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the canned answer for it.
struct Expectation {
    method: Method,
    path: String,
    response: Result<TransportResponse, TransportFailure>,
}

#[derive(Default)]
struct MockState {
    expectations: Mutex<VecDeque<Expectation>>,
    requests: Mutex<Vec<TransportRequest>>,
}

#[async_trait]
impl Transport for MockState {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFailure> {
        self.requests.lock().push(request.clone());
        let expectation = self.expectations.lock().pop_front();

        match expectation {
            Some(exp) if exp.method == request.method && exp.path == request.path => exp.response,
            Some(exp) => panic!(
                "Unexpected request: got {} {}, expected {} {}",
                request.method, request.path, exp.method, exp.path
            ),
            None => panic!(
                "Unexpected request: {} {} (no expectations left)",
                request.method, request.path
            ),
        }
    }
}

/// A transport with expectation tracking for fluent testing.
///
/// Expectations are consumed in order. Every request is also recorded so tests
/// can assert on headers and bodies afterwards.
#[derive(Default)]
pub struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the transport for use in tests.
    pub fn transport(&self) -> Arc<dyn Transport> {
        self.state.clone()
    }

    /// Expects a `GET` of `path`.
    pub fn expect_get(&mut self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Get, path)
    }

    /// Expects a `POST` to `path`.
    pub fn expect_post(&mut self, path: impl Into<String>) -> ExpectationBuilder {
        self.expect(Method::Post, path)
    }

    fn expect(&mut self, method: Method, path: impl Into<String>) -> ExpectationBuilder {
        ExpectationBuilder {
            method,
            path: path.into(),
            state: self.state.clone(),
        }
    }

    /// Every request seen so far, in dispatch order.
    pub fn requests(&self) -> Vec<TransportRequest> {
        self.state.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().len()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.state.expectations.lock().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder {
    method: Method,
    path: String,
    state: Arc<MockState>,
}

impl ExpectationBuilder {
    /// Answers with `status` and a JSON body.
    pub fn return_json(self, status: u16, body: serde_json::Value) {
        self.respond(Ok(TransportResponse::json(status, &body)));
    }

    /// Answers with `status` and a raw body.
    pub fn return_raw(self, status: u16, body: impl Into<Vec<u8>>) {
        self.respond(Ok(TransportResponse::new(status, body)));
    }

    /// Fails without a response.
    pub fn return_failure(self, failure: TransportFailure) {
        self.respond(Err(failure));
    }

    fn respond(self, response: Result<TransportResponse, TransportFailure>) {
        self.state.expectations.lock().push_back(Expectation {
            method: self.method,
            path: self.path,
            response,
        });
    }
}

// =============================================================================
// CHANNEL TRANSPORT
// =============================================================================

/// Responder handed to the test for one in-flight request.
pub type PendingResponse = oneshot::Sender<Result<TransportResponse, TransportFailure>>;

/// A request waiting for the test to answer it.
#[derive(Debug)]
pub struct PendingRequest {
    pub request: TransportRequest,
    pub respond_to: PendingResponse,
}

struct ChannelTransport {
    sender: mpsc::Sender<PendingRequest>,
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFailure> {
        let (respond_to, response) = oneshot::channel();
        let pending = PendingRequest {
            request,
            respond_to,
        };
        if self.sender.send(pending).await.is_err() {
            return Err(closed());
        }
        match response.await {
            Ok(result) => result,
            Err(_) => Err(closed()),
        }
    }
}

fn closed() -> TransportFailure {
    TransportFailure::Unreachable("mock transport closed".into())
}

/// Creates a transport and a receiver for asserting and answering requests.
///
/// # Testing Strategy
/// Each request parks until the test answers it through the `respond_to`
/// sender, so the test decides exactly when and in which order calls resolve.
pub fn create_mock_transport(
    buffer_size: usize,
) -> (Arc<dyn Transport>, mpsc::Receiver<PendingRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (Arc::new(ChannelTransport { sender }), receiver)
}

/// Waits for the next request.
pub async fn expect_request(
    receiver: &mut mpsc::Receiver<PendingRequest>,
) -> Option<(TransportRequest, PendingResponse)> {
    receiver
        .recv()
        .await
        .map(|pending| (pending.request, pending.respond_to))
}
