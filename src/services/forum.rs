//! # Forum Service
//!
//! The forum directory is fetched once and kept in a permanent cache; forum
//! pages resolve their forum from that cache without a request. Posts and
//! comments are not cached.

use crate::clients::ForumClient;
use crate::framework::ApiResult;
use crate::model::{Forum, Post};
use crate::store::{write_blocking, EntityCacheStore};
use std::sync::Arc;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct ForumService {
    client: ForumClient,
    cache: Arc<EntityCacheStore<Forum>>,
}

impl ForumService {
    pub fn new(client: ForumClient, cache: Arc<EntityCacheStore<Forum>>) -> Self {
        Self { client, cache }
    }

    /// Fetches the directory and replaces the cache. A failure leaves the
    /// cache as it was.
    #[instrument(skip(self))]
    pub async fn load_forums(&self) -> ApiResult<Vec<Forum>> {
        let forums = self.client.get_forums().await?;
        let items = forums.clone();
        write_blocking(&self.cache, move |c| c.set(items)).await;
        Ok(forums)
    }

    /// Cached directory if loaded, otherwise one fetch.
    pub async fn ensure_forums(&self) -> ApiResult<Vec<Forum>> {
        match self.cache.get() {
            Some(forums) => {
                debug!(size = forums.len(), "Forum cache hit");
                Ok(forums)
            }
            None => self.load_forums().await,
        }
    }

    pub async fn refresh_forums(&self) -> ApiResult<Vec<Forum>> {
        write_blocking(&self.cache, |c| c.invalidate()).await;
        self.load_forums().await
    }

    /// Cache lookup only. `None` before the directory is loaded, too.
    pub fn forum_by_id(&self, forum_id: u64) -> Option<Forum> {
        self.cache.lookup_by_id(forum_id)
    }

    pub async fn forum_posts(&self, forum_id: u64) -> ApiResult<Vec<Post>> {
        self.client.get_forum_posts(forum_id).await
    }

    pub fn client(&self) -> &ForumClient {
        &self.client
    }

    pub fn cache(&self) -> &Arc<EntityCacheStore<Forum>> {
        &self.cache
    }
}
