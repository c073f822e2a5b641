//! Client-side state: the session and cached collections.
//!
//! Stores are built once by the composition root and shared by `Arc`. Reads
//! are synchronous; writes go through each store's own setters and are
//! written through to [`SnapshotStorage`].

pub mod entity_cache;
pub mod persistence;
pub mod session;

pub use entity_cache::*;
pub use persistence::*;
pub use session::*;
