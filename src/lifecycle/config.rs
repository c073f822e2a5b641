//! Environment-driven client configuration.

use crate::framework::transport::with_trailing_slash;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Base URL of the forum API.
pub const FORUM_API_URL_ENV: &str = "FORUM_API_URL";

/// Directory holding persisted snapshots.
pub const FORUM_STATE_DIR_ENV: &str = "FORUM_STATE_DIR";

pub const DEFAULT_API_URL: &str = "http://localhost:5173/api/";

pub const DEFAULT_STATE_DIR: &str = ".forum-client";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid API base URL {value:?}: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Environment abstraction, so tests need no process env mutation.
pub trait ConfigEnv {
    fn string(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl ConfigEnv for ProcessEnv {
    fn string(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Where the API lives and where snapshots go.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    base_url: Url,
    state_dir: PathBuf,
}

impl ClientConfig {
    /// The base URL always ends with `/`, so relative paths join under it.
    pub fn new(base_url: Url, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            state_dir: state_dir.into(),
        }
    }

    /// Reads `FORUM_API_URL` and `FORUM_STATE_DIR`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(&ProcessEnv)
    }

    /// Blank values count as unset.
    pub fn from_env_with(env: &impl ConfigEnv) -> Result<Self, ConfigError> {
        let raw_url = setting(env, FORUM_API_URL_ENV, DEFAULT_API_URL);
        let base_url = Url::parse(raw_url.trim()).map_err(|source| ConfigError::InvalidBaseUrl {
            value: raw_url.clone(),
            source,
        })?;
        let state_dir = setting(env, FORUM_STATE_DIR_ENV, DEFAULT_STATE_DIR);

        Ok(Self::new(base_url, state_dir))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }
}

/// The named value, or `default` when it is unset or blank.
fn setting(env: &impl ConfigEnv, name: &str, default: &str) -> String {
    env.string(name)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
