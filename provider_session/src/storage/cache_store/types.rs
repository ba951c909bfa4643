use async_trait::async_trait;
use std::collections::HashMap;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

pub(crate) struct InMemoryCacheStore {
    pub(super) entry: HashMap<String, CacheData>,
    #[cfg(test)]
    pub(super) fail_writes: bool,
}

pub(crate) struct RedisCacheStore {
    pub(super) client: redis::Client,
}

#[async_trait]
pub(crate) trait CacheStore: Send + Sync + 'static {
    /// Initialize the store. This is called when the store is created.
    async fn init(&self) -> Result<(), StorageError>;

    /// Put a record into the store.
    #[allow(dead_code)] // Used in tests
    async fn put(&mut self, prefix: &str, key: &str, value: CacheData) -> Result<(), StorageError>;

    /// Put a record into the store with a TTL. The write is atomic per record:
    /// a concurrent reader sees either the previous record or the new one.
    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError>;

    /// Get a record from the store.
    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError>;

    /// Remove a record from the store. Removing an absent record is not an error.
    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError>;

    /// Make subsequent writes fail, to exercise persist-failure paths.
    #[cfg(test)]
    fn set_fail_writes(&mut self, _fail: bool) {}
}
