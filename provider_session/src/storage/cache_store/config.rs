use std::{env, sync::LazyLock};
use tokio::sync::Mutex;

use super::types::{CacheStore, InMemoryCacheStore, RedisCacheStore};

pub(super) static SESSION_CACHE_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("SESSION_CACHE_STORE").unwrap_or_else(|_| "memory".to_string())
});

pub(super) static SESSION_CACHE_STORE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("SESSION_CACHE_STORE_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
});

pub(crate) static SESSION_CACHE_STORE: LazyLock<Mutex<Box<dyn CacheStore>>> = LazyLock::new(|| {
    let store_type = SESSION_CACHE_STORE_TYPE.as_str();

    let store: Box<dyn CacheStore> = match store_type {
        "memory" => Box::new(InMemoryCacheStore::new()),
        "redis" => {
            let store_url = SESSION_CACHE_STORE_URL.as_str();
            tracing::info!("Initializing redis session store at {}", store_url);

            let client = match redis::Client::open(store_url) {
                Ok(client) => client,
                Err(e) => {
                    tracing::error!("Failed to create Redis client: {}", e);
                    panic!("Failed to create Redis client: {e}");
                }
            };
            let store = RedisCacheStore { client };
            // Verify the connection at bootstrap; later failures surface as
            // StoreUnavailable on the request path instead.
            if let Err(e) = tokio::task::block_in_place(|| {
                tokio::runtime::Handle::current().block_on(async { store.init().await })
            }) {
                tracing::error!("Failed to connect to Redis: {}", e);
                panic!("Failed to connect to Redis: {e}");
            }
            Box::new(store)
        }
        t => panic!("Unsupported session store type: {t}. Supported types are 'memory' and 'redis'"),
    };

    tracing::info!("Session cache store ready: type={}", store_type);

    Mutex::new(store)
});
