//! # Error Normalization
//!
//! Every failure that crosses the transport boundary is folded into a single
//! [`ApiError`] value. Callers never see a raw `reqwest::Error` or an I/O error:
//! they get a kind they can branch on, a status-like `code`, and a message that
//! is always safe to show to a user.
//!
//! The rules in [`normalize`] are ordered and the first match wins:
//!
//! 1. **HTTP response** with a non-2xx status: the message is the body's `error`
//!    field if the body is a JSON object carrying one, otherwise the status text,
//!    otherwise `HTTP <status> error`. The code is the status.
//! 2. **Unreachable server**: `NetworkFailure`, code `0`.
//! 3. **Generic error with a message**: `Unknown`, code `500`, that message.
//! 4. **Anything else**: `Unknown`, code `500`, `Unknown error occurred`.

use serde::Deserialize;
use std::fmt;

/// Message used for every connection-level failure.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: Server is not responding";

/// Message used when nothing better is known about a failure.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";

/// Message used when a wrapped call panics inside a load controller.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error occurred";

/// Code reported for failures that did not come with an HTTP status.
pub const UNKNOWN_ERROR_CODE: u16 = 500;

/// Code reported when the server could not be reached at all.
pub const NETWORK_ERROR_CODE: u16 = 0;

/// Result type returned by every outbound call in the crate.
pub type ApiResult<T> = Result<T, ApiError>;

/// The fixed set of failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// The transport could not reach the server.
    NetworkFailure,
    /// The server answered with a non-2xx status.
    HttpFailure { status: u16 },
    /// The server answered 2xx but the body did not match the declared shape.
    DecodeFailure,
    /// Anything unclassified.
    Unknown,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::NetworkFailure => write!(f, "network failure"),
            ApiErrorKind::HttpFailure { status } => write!(f, "http failure ({status})"),
            ApiErrorKind::DecodeFailure => write!(f, "decode failure"),
            ApiErrorKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// A fully classified failure of an outbound call.
///
/// Fields are private: an `ApiError` only comes out of [`normalize`] (or the
/// load controller's panic conversion), so it is never partially filled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
    code: u16,
}

impl ApiError {
    pub(crate) fn http(status: u16, message: String) -> Self {
        Self {
            kind: ApiErrorKind::HttpFailure { status },
            message,
            code: status,
        }
    }

    pub(crate) fn network() -> Self {
        Self {
            kind: ApiErrorKind::NetworkFailure,
            message: NETWORK_ERROR_MESSAGE.to_string(),
            code: NETWORK_ERROR_CODE,
        }
    }

    /// Keeps its own kind, but reports the same code as `Unknown`.
    pub(crate) fn decode(detail: &str) -> Self {
        Self {
            kind: ApiErrorKind::DecodeFailure,
            message: format!("Failed to decode response: {detail}"),
            code: UNKNOWN_ERROR_CODE,
        }
    }

    pub(crate) fn unknown(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            kind: ApiErrorKind::Unknown,
            message,
            code: UNKNOWN_ERROR_CODE,
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// The HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ApiErrorKind::HttpFailure { status } => Some(status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        self.kind == ApiErrorKind::NetworkFailure
    }
}

/// Raw failure reported by a [`Transport`](super::Transport) or by the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFailure {
    /// The server answered with a non-2xx status.
    Status {
        status: u16,
        status_text: Option<String>,
        body: Vec<u8>,
    },
    /// The server could not be reached (connect refused, DNS, reset, timeout).
    Unreachable(String),
    /// A 2xx body did not decode into the declared type.
    Decode(String),
    /// Any other error value; may carry an empty message.
    Other(String),
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Status { status, .. } => write!(f, "status {status}"),
            TransportFailure::Unreachable(detail) => write!(f, "unreachable: {detail}"),
            TransportFailure::Decode(detail) => write!(f, "decode: {detail}"),
            TransportFailure::Other(detail) => write!(f, "other: {detail}"),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<serde_json::Value>,
}

/// Classify a transport failure. Total: always returns a non-empty message.
pub fn normalize(failure: TransportFailure) -> ApiError {
    match failure {
        TransportFailure::Status {
            status,
            status_text,
            body,
        } => {
            let message = error_field(&body)
                .or_else(|| status_text.filter(|text| !text.trim().is_empty()))
                .unwrap_or_else(|| format!("HTTP {status} error"));
            ApiError::http(status, message)
        }
        TransportFailure::Unreachable(_) => ApiError::network(),
        TransportFailure::Decode(detail) => ApiError::decode(&detail),
        TransportFailure::Other(message) => ApiError::unknown(message),
    }
}

fn error_field(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.error? {
        serde_json::Value::String(text) if !text.trim().is_empty() => Some(text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16, status_text: Option<&str>, body: &[u8]) -> TransportFailure {
        TransportFailure::Status {
            status,
            status_text: status_text.map(str::to_string),
            body: body.to_vec(),
        }
    }

    #[test]
    fn test_http_failure_uses_error_field() {
        let body = br#"{"error":"Invalid credentials"}"#;
        let err = normalize(status(401, Some("Unauthorized"), body));
        assert_eq!(err.kind(), ApiErrorKind::HttpFailure { status: 401 });
        assert_eq!(err.message(), "Invalid credentials");
        assert_eq!(err.code(), 401);
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_malformed_bodies_fall_back_with_status_code() {
        let bodies: [&[u8]; 6] = [
            b"",
            b"not json",
            b"[1,2,3]",
            br#"{"message":"nope"}"#,
            br#"{"error":42}"#,
            br#"{"error":""}"#,
        ];
        for body in bodies {
            let with_text = normalize(status(404, Some("Not Found"), body));
            assert_eq!(with_text.message(), "Not Found");
            assert_eq!(with_text.code(), 404);

            let without_text = normalize(status(503, None, body));
            assert_eq!(without_text.message(), "HTTP 503 error");
            assert_eq!(without_text.code(), 503);

            let blank_text = normalize(status(418, Some("  "), body));
            assert_eq!(blank_text.message(), "HTTP 418 error");
        }
    }

    #[test]
    fn test_unreachable_is_network_failure() {
        let err = normalize(TransportFailure::Unreachable("connection refused".into()));
        assert!(err.is_network());
        assert_eq!(err.code(), 0);
        assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn test_other_with_and_without_message() {
        let err = normalize(TransportFailure::Other("body stream closed".into()));
        assert_eq!(err.kind(), ApiErrorKind::Unknown);
        assert_eq!(err.code(), 500);
        assert_eq!(err.message(), "body stream closed");

        let err = normalize(TransportFailure::Other(String::new()));
        assert_eq!(err.message(), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(err.code(), 500);
    }

    #[test]
    fn test_decode_failure_is_reported_with_unknown_code() {
        let err = normalize(TransportFailure::Decode("missing field `id`".into()));
        assert_eq!(err.kind(), ApiErrorKind::DecodeFailure);
        assert_eq!(err.code(), 500);
        assert!(err.message().contains("missing field `id`"));
        assert_eq!(err.to_string(), err.message());
    }
}
