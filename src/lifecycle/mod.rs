pub mod config;
pub mod forum_app;
pub mod load;
pub mod tracing;

pub use config::{ClientConfig, ConfigEnv, ConfigError, ProcessEnv};
pub use forum_app::ForumApp;
pub use load::{LoadController, LoadOptions, LoadState};
pub use tracing::setup_tracing;
