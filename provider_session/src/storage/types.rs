use serde::{Deserialize, Serialize};

/// Data stored in the session cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CacheData {
    pub(crate) value: String,
}
