mod cache_store;
mod errors;
mod types;

pub(crate) use cache_store::SESSION_CACHE_STORE;
pub(crate) use types::CacheData;

use errors::StorageError;

pub(crate) async fn init() -> Result<(), StorageError> {
    let _ = &*cache_store::SESSION_CACHE_STORE;
    Ok(())
}
