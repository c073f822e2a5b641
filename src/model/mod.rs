//! Wire-level data structures (DTOs) shared by clients, stores and services.

pub mod auth;
pub mod forum;

pub use auth::*;
pub use forum::*;
