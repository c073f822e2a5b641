//! Typed request/result plumbing.
//!
//! This module turns unreliable network calls into typed, recoverable results.
//!
//! # Main Components
//!
//! - [`Transport`] - The seam to the network ([`HttpTransport`] in production)
//! - [`RequestExecutor`] - Runs interceptors, dispatches, decodes, normalizes
//! - [`ApiError`] / [`ApiResult`] - The only failure type callers ever see
//! - [`normalize`] - Classifies raw transport failures
//!
//! # Testing
//!
//! See [`mock`] module for transports that need no server.

pub mod error;
pub mod executor;
pub mod mock;
pub mod transport;

// Re-export core types for convenience
pub use error::{normalize, ApiError, ApiErrorKind, ApiResult, TransportFailure};
pub use executor::{RequestExecutor, RequestExecutorBuilder, RequestInterceptor};
pub use transport::{HttpTransport, Method, Transport, TransportRequest, TransportResponse};
