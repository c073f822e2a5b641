//! # Transport
//!
//! The seam between the executor and the network. A [`Transport`] moves one
//! [`TransportRequest`] to the server and hands back whatever came back, for any
//! status. Deciding what counts as a failure is the executor's job.
//!
//! [`HttpTransport`] is the production implementation on top of `reqwest`.
//! Test doubles live in [`mock`](super::mock).

use super::error::TransportFailure;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use tracing::debug;
use url::Url;

/// HTTP methods used by the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// One outbound call, before it hits the wire.
///
/// `path` is relative to the API base URL (e.g. `forums/1/posts`).
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl TransportRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header, replacing any earlier value under the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers
            .retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What came back from the server, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: Option<String>,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: None,
            body: body.into(),
        }
    }

    /// Builds a response with a JSON body.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string().into_bytes())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Moves requests to the server.
///
/// Implementations return `Ok` for every response the server produced,
/// including 4xx/5xx, and `Err` only when no response was obtained.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFailure>;
}

/// `reqwest`-backed transport rooted at an API base URL.
///
/// No request timeout is configured: an unresponsive server stalls the call.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Builds a transport for `base_url`. A missing trailing slash is added so
    /// relative paths resolve underneath it.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url: with_trailing_slash(base_url),
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

pub(crate) fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportFailure> {
        let url = self
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(invalid_path)?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_send_error)?;
        let bytes = body.len();
        debug!(status = status.as_u16(), bytes, "Response received");

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().map(str::to_string),
            body: body.to_vec(),
        })
    }
}

fn invalid_path(error: url::ParseError) -> TransportFailure {
    TransportFailure::Other(format!("invalid request path: {error}"))
}

fn map_send_error(error: reqwest::Error) -> TransportFailure {
    if error.is_connect() || error.is_timeout() || error.is_request() {
        TransportFailure::Unreachable(error.to_string())
    } else {
        TransportFailure::Other(error.to_string())
    }
}
