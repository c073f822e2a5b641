use crate::clients::ResourceClient;
use crate::framework::ApiResult;
use crate::store::{write_blocking, CacheEntity, EntityCacheStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

/// A list resource paired with its cache.
pub struct CachedResource<T: CacheEntity, C> {
    client: C,
    cache: Arc<EntityCacheStore<T>>,
    _entity: PhantomData<fn() -> T>,
}

impl<T, C> CachedResource<T, C>
where
    T: CacheEntity + Serialize + DeserializeOwned,
    C: ResourceClient<T>,
{
    pub fn new(client: C, cache: Arc<EntityCacheStore<T>>) -> Self {
        Self {
            client,
            cache,
            _entity: PhantomData,
        }
    }

    /// Fetches the list and stores it.
    pub async fn load_all(&self) -> ApiResult<Vec<T>> {
        let items = self.client.list().await?;
        let cached = items.clone();
        write_blocking(&self.cache, move |c| c.set(cached)).await;
        Ok(items)
    }

    pub fn cache(&self) -> &Arc<EntityCacheStore<T>> {
        &self.cache
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::EntityClient;
    use crate::framework::mock::MockTransport;
    use crate::framework::RequestExecutor;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tagged {
        id: u64,
        name: String,
        tags: Vec<String>,
    }

    impl CacheEntity for Tagged {
        type Id = u64;

        fn id(&self) -> u64 {
            self.id
        }
    }

    #[tokio::test]
    async fn test_load_all_fills_cache() {
        let mut mock = MockTransport::new();
        let items = json!([{"id": 1, "name": "Data 1", "tags": ["tag1"]}]);
        mock.expect_get("data1").return_json(200, items);
        mock.expect_get("data1")
            .return_json(500, json!({"error": "boom"}));
        let executor = RequestExecutor::new(mock.transport());
        let client = EntityClient::<Tagged>::new(executor, "data1");
        let resource = CachedResource::new(client, Arc::new(EntityCacheStore::new()));

        resource.load_all().await.unwrap();
        let name = resource.cache().lookup_by_id(1).map(|t| t.name);
        assert_eq!(name.as_deref(), Some("Data 1"));

        assert_eq!(resource.load_all().await.unwrap_err().message(), "boom");
        assert!(resource.cache().is_loaded());
    }
}
