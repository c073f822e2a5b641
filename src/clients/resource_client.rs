use crate::framework::{ApiResult, RequestExecutor};
use crate::store::CacheEntity;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Trait for collection-shaped clients to inherit the standard reads.
///
/// Implementors name their collection path; `list` and `get` come for free as
/// `GET {collection}` and `GET {collection}/{id}`.
#[async_trait]
pub trait ResourceClient<T>: Send + Sync
where
    T: CacheEntity + DeserializeOwned,
{
    /// Access the shared executor.
    fn executor(&self) -> &RequestExecutor;

    /// Collection path relative to the API base (e.g. `forums`).
    fn collection(&self) -> &str;

    /// Fetch the whole collection.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> ApiResult<Vec<T>> {
        tracing::debug!("Sending request");
        self.executor().get(self.collection()).await
    }

    /// Fetch one entity by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> ApiResult<T> {
        tracing::debug!("Sending request");
        let path = format!("{}/{}", self.collection(), id);
        self.executor().get(&path).await
    }
}
