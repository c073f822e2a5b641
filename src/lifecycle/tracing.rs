//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for the binary. The
//! library itself only emits events; embedding applications install their
//! own subscriber.
//!
//! ## What Gets Traced
//!
//! - **Requests**: one `instrument` span per client call, with its arguments
//! - **Session**: login and logout transitions
//! - **Caches**: set and invalidate, with collection size
//! - **Failures**: normalized errors with status and message
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Request paths and payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the request layer
//! RUST_LOG=forum_client::framework=debug cargo run
//! ```
//!
//! With `RUST_LOG=debug` a forum listing shows:
//!
//! ```text
//! DEBUG list: Sending request
//! DEBUG list: Sending request method=GET path="forums"
//! INFO Cache set size=3
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
