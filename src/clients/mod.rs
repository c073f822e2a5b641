//! Typed per-resource clients built on [`RequestExecutor`](crate::framework::RequestExecutor).

pub mod auth_client;
pub mod entity_client;
pub mod forum_client;
pub mod resource_client;

pub use auth_client::*;
pub use entity_client::*;
pub use forum_client::*;
pub use resource_client::*;
