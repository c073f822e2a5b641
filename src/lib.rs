//! # Forum Client
//!
//! > **A typed, session-aware client for a small forum API.**
//!
//! Every network call is funneled through one executor that attaches the
//! current session and turns every outcome into an [`ApiResult`](framework::ApiResult).
//! Client-side state (the session and the forum directory) lives in explicit
//! stores that are written through to disk, so a restart resumes where the
//! last run left off.
//!
//! ## Architecture Notes
//!
//! ### 1. Throw-free results
//! Callers never see a transport error, a panic or an undecodable body. Everything
//! is normalized into [`ApiError`](framework::ApiError), which carries a kind,
//! a message that is never empty and a numeric code (`0` when the server was unreachable).
//!
//! ### 2. Injected state
//! Stores are constructed once in [`ForumApp`](lifecycle::ForumApp) and shared by `Arc`.
//! The session credential is attached by an interceptor registered on the
//! executor, not looked up from inside the request path.
//!
//! ### 3. Load lifecycle
//! [`LoadController`](lifecycle::LoadController) gives each consumer the same
//! `{data, loading, error}` contract with eager or lazy execution.
//!
//! ### 4. Observability
//! `tracing` spans on every client call. See the [`lifecycle::tracing`] module.
//!
//! ## Module Tour
//!
//! ### 1. The Plumbing ([`framework`])
//! - **Key items**: [`Transport`](framework::Transport),
//!   [`RequestExecutor`](framework::RequestExecutor), [`normalize`](framework::normalize),
//!   [`mock`](framework::mock).
//!
//! ### 2. The Interface ([`clients`])
//! - **Role**: One method per endpoint, each a fixed path plus a declared response type.
//! - **Key items**: [`ForumClient`](clients::ForumClient), [`AuthClient`](clients::AuthClient).
//!
//! ### 3. The State ([`store`], [`services`], [`guard`])
//! - **Key items**: [`SessionStore`](store::SessionStore),
//!   [`EntityCacheStore`](store::EntityCacheStore), [`AuthService`](services::AuthService),
//!   [`AuthGuard`](guard::AuthGuard).
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! - **Key items**: [`ClientConfig`](lifecycle::ClientConfig), [`ForumApp`](lifecycle::ForumApp).
//!
//! ## Quick Start
//!
//! ```bash
//! # Against a local API with info logs
//! FORUM_API_URL=http://localhost:5173/api/ RUST_LOG=info cargo run -- user1 password1
//! ```

pub mod clients;
pub mod framework;
pub mod guard;
pub mod lifecycle;
pub mod model;
pub mod services;
pub mod store;
