use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::utils::gen_random_string;

use super::errors::UserError;
use super::types::User;
use super::UserDirectory;
use async_trait::async_trait;

/// In-memory user directory for demos and tests. The map is held behind one
/// lock, so upserts are atomic the same way the SQLite directory's are.
#[derive(Default)]
pub struct MemoryUserDirectory {
    users: Mutex<HashMap<(String, String), User>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn upsert_user(
        &self,
        provider: &str,
        external_id: &str,
        email: &str,
    ) -> Result<User, UserError> {
        let mut users = self.users.lock().await;
        let key = (provider.to_string(), external_id.to_string());
        let now = Utc::now();

        if let Some(user) = users.get_mut(&key) {
            user.email = email.to_string();
            user.updated_at = now;
            return Ok(user.clone());
        }

        let user = User {
            id: gen_random_string(16).map_err(|e| UserError::Crypto(e.to_string()))?,
            provider: provider.to_string(),
            external_id: external_id.to_string(),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.insert(key, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, UserError> {
        let users = self.users.lock().await;
        Ok(users.values().find(|u| u.id == user_id).cloned())
    }
}
