use async_trait::async_trait;
use std::collections::HashMap;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{CacheStore, InMemoryCacheStore};

const CACHE_PREFIX: &str = "cache";

impl InMemoryCacheStore {
    pub(crate) fn new() -> Self {
        tracing::info!("Creating new in-memory session cache store");
        Self {
            entry: HashMap::new(),
            #[cfg(test)]
            fail_writes: false,
        }
    }

    fn make_key(prefix: &str, key: &str) -> String {
        format!("{CACHE_PREFIX}:{prefix}:{key}")
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn put(&mut self, prefix: &str, key: &str, value: CacheData) -> Result<(), StorageError> {
        #[cfg(test)]
        if self.fail_writes {
            return Err(StorageError::Storage("injected write failure".to_string()));
        }
        let key = Self::make_key(prefix, key);
        self.entry.insert(key, value);
        Ok(())
    }

    // TTL is advisory here; record expiry is enforced at the session layer
    // against the expires_at field.
    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        _ttl: usize,
    ) -> Result<(), StorageError> {
        #[cfg(test)]
        if self.fail_writes {
            return Err(StorageError::Storage("injected write failure".to_string()));
        }
        let key = Self::make_key(prefix, key);
        self.entry.insert(key, value);
        Ok(())
    }

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let key = Self::make_key(prefix, key);
        Ok(self.entry.get(&key).cloned())
    }

    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError> {
        let key = Self::make_key(prefix, key);
        self.entry.remove(&key);
        Ok(())
    }

    #[cfg(test)]
    fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}
