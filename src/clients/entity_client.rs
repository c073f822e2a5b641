use crate::clients::resource_client::ResourceClient;
use crate::framework::RequestExecutor;
use crate::store::CacheEntity;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// Client for an arbitrary list resource (`GET {collection}`, `GET {collection}/{id}`).
pub struct EntityClient<T> {
    executor: RequestExecutor,
    collection: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityClient<T> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            collection: self.collection.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> EntityClient<T> {
    pub fn new(executor: RequestExecutor, collection: impl Into<String>) -> Self {
        Self {
            executor,
            collection: collection.into().trim_matches('/').to_string(),
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<T> ResourceClient<T> for EntityClient<T>
where
    T: CacheEntity + DeserializeOwned,
{
    fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    fn collection(&self) -> &str {
        &self.collection
    }
}
