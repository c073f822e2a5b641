//! Operations that combine a client call with a store update.

pub mod auth;
pub mod entity;
pub mod forum;

pub use auth::AuthService;
pub use entity::CachedResource;
pub use forum::ForumService;
