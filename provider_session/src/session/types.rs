use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::session::errors::SessionError;
use crate::storage::CacheData;

/// Recognized session value keys, as exposed to downstream handlers.
pub const KEY_USER_ID: &str = "userID";
pub const KEY_USER_EMAIL: &str = "userEmail";
pub const KEY_PROVIDER: &str = "provider";
pub const KEY_WORKSPACE_ID: &str = "workspaceID";
pub const KEY_WORKSPACE_NAME: &str = "workspaceName";

/// Named session values plus an extension map for unrecognized keys.
///
/// The authenticated triple (`user_id`, `user_email`, `provider`) is written
/// only as a unit by the login callback path; `workspace_id`/`workspace_name`
/// are reserved and never populated by this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionValues {
    pub user_id: Option<String>,
    pub user_email: Option<String>,
    pub provider: Option<String>,
    pub workspace_id: Option<String>,
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub extra: HashMap<String, String>,
}

impl SessionValues {
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            KEY_USER_ID => self.user_id.as_deref(),
            KEY_USER_EMAIL => self.user_email.as_deref(),
            KEY_PROVIDER => self.provider.as_deref(),
            KEY_WORKSPACE_ID => self.workspace_id.as_deref(),
            KEY_WORKSPACE_NAME => self.workspace_name.as_deref(),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// Keys that currently hold a value, recognized names first.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        for (key, value) in [
            (KEY_USER_ID, &self.user_id),
            (KEY_USER_EMAIL, &self.user_email),
            (KEY_PROVIDER, &self.provider),
            (KEY_WORKSPACE_ID, &self.workspace_id),
            (KEY_WORKSPACE_NAME, &self.workspace_name),
        ] {
            if value.is_some() {
                keys.push(key);
            }
        }
        keys.extend(self.extra.keys().map(String::as_str));
        keys
    }
}

/// Persisted session record. Serialized as a whole so every save is atomic
/// per record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredSession {
    pub(crate) values: SessionValues,
    pub(crate) csrf_token: String,
    pub(crate) expires_at: DateTime<Utc>,
    pub(crate) ttl: u64,
}

impl From<StoredSession> for CacheData {
    fn from(data: StoredSession) -> Self {
        Self {
            value: serde_json::to_string(&data).expect("Failed to serialize StoredSession"),
        }
    }
}

impl TryFrom<CacheData> for StoredSession {
    type Error = SessionError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&data.value).map_err(|e| SessionError::InvalidRecord(e.to_string()))
    }
}

/// Request-scoped session handle.
///
/// `fresh` is a handle property, not persisted: it is true only for the
/// request cycle in which the session was created or re-authenticated, and
/// false whenever the record was loaded from the store.
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) id: String,
    pub(crate) fresh: bool,
    pub(crate) record: StoredSession,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn fresh(&self) -> bool {
        self.fresh
    }

    pub fn csrf_token(&self) -> &str {
        &self.record.csrf_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.record.expires_at
    }

    /// True when the session carries a non-empty user id.
    pub fn is_authenticated(&self) -> bool {
        self.record
            .values
            .user_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }

    pub fn values(&self) -> &SessionValues {
        &self.record.values
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.record.values.get(key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.record.values.keys()
    }

    /// Set a session value on the handle. Must be followed by a save to
    /// persist. The authenticated triple cannot be written through here; it
    /// is only ever set as a unit by the login callback path.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        match key {
            KEY_USER_ID | KEY_USER_EMAIL | KEY_PROVIDER => {
                tracing::warn!(key, "refusing to set authenticated field outside login path");
            }
            KEY_WORKSPACE_ID => self.record.values.workspace_id = Some(value.into()),
            KEY_WORKSPACE_NAME => self.record.values.workspace_name = Some(value.into()),
            other => {
                self.record.values.extra.insert(other.to_string(), value.into());
            }
        }
    }

    /// Set the authenticated triple as a unit and mark the handle fresh.
    pub(crate) fn authenticate(&mut self, user_id: &str, user_email: &str, provider: &str) {
        self.record.values.user_id = Some(user_id.to_string());
        self.record.values.user_email = Some(user_email.to_string());
        self.record.values.provider = Some(provider.to_string());
        self.fresh = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_values(values: SessionValues) -> Session {
        Session {
            id: "sid".to_string(),
            fresh: false,
            record: StoredSession {
                values,
                csrf_token: "token".to_string(),
                expires_at: Utc::now() + chrono::Duration::seconds(600),
                ttl: 600,
            },
        }
    }

    #[test]
    fn test_values_get_recognized_and_extension_keys() {
        let mut values = SessionValues::default();
        values.user_id = Some("u1".to_string());
        values.extra.insert("theme".to_string(), "dark".to_string());

        assert_eq!(values.get(KEY_USER_ID), Some("u1"));
        assert_eq!(values.get(KEY_USER_EMAIL), None);
        assert_eq!(values.get("theme"), Some("dark"));
        assert_eq!(values.get("missing"), None);
    }

    #[test]
    fn test_keys_lists_only_populated_fields() {
        let mut values = SessionValues::default();
        values.user_id = Some("u1".to_string());
        values.provider = Some("google".to_string());

        let keys = values.keys();
        assert!(keys.contains(&KEY_USER_ID));
        assert!(keys.contains(&KEY_PROVIDER));
        assert!(!keys.contains(&KEY_USER_EMAIL));
        assert!(!keys.contains(&KEY_WORKSPACE_ID));
    }

    #[test]
    fn test_set_refuses_authenticated_triple() {
        let mut session = session_with_values(SessionValues::default());

        session.set(KEY_USER_ID, "u1");
        session.set(KEY_USER_EMAIL, "a@b.com");
        session.set(KEY_PROVIDER, "google");
        assert!(!session.is_authenticated());
        assert_eq!(session.get(KEY_USER_ID), None);

        session.set(KEY_WORKSPACE_ID, "w1");
        session.set("theme", "dark");
        assert_eq!(session.get(KEY_WORKSPACE_ID), Some("w1"));
        assert_eq!(session.get("theme"), Some("dark"));
    }

    #[test]
    fn test_authenticate_sets_triple_as_unit() {
        let mut session = session_with_values(SessionValues::default());
        session.authenticate("u1", "a@b.com", "google");

        assert!(session.is_authenticated());
        assert!(session.fresh());
        assert_eq!(session.get(KEY_USER_ID), Some("u1"));
        assert_eq!(session.get(KEY_USER_EMAIL), Some("a@b.com"));
        assert_eq!(session.get(KEY_PROVIDER), Some("google"));
    }

    #[test]
    fn test_stored_session_cache_data_roundtrip() {
        let mut values = SessionValues::default();
        values.user_id = Some("u1".to_string());
        let stored = StoredSession {
            values,
            csrf_token: "token".to_string(),
            expires_at: Utc::now(),
            ttl: 600,
        };

        let data: CacheData = stored.clone().into();
        let back: StoredSession = data.try_into().expect("decode record");
        assert_eq!(back.values, stored.values);
        assert_eq!(back.csrf_token, stored.csrf_token);
        assert_eq!(back.ttl, stored.ttl);
    }

    #[test]
    fn test_undecodable_record_is_an_error() {
        let data = CacheData {
            value: "not json".to_string(),
        };
        let result: Result<StoredSession, _> = data.try_into();
        assert!(matches!(result, Err(SessionError::InvalidRecord(_))));
    }
}
