use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user known to the directory, keyed by a stable internal id that never
/// changes across logins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub provider: String,
    pub external_id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
