use chrono::{Duration, Utc};
use http::header::HeaderMap;

use crate::session::config::SESSION_COOKIE_MAX_AGE;
use crate::session::errors::SessionError;
use crate::session::types::{Session, SessionValues, StoredSession};
use crate::storage::SESSION_CACHE_STORE;
use crate::utils::gen_random_string;

use super::cookie::{clear_session_cookie, get_session_id_from_headers, issue_session_cookie};

const SESSION_PREFIX: &str = "session";

/// Look up the session bound to the request's cookie, or create a new one.
///
/// Returns the session handle plus the response headers the caller must
/// emit: empty for an existing session, a `Set-Cookie` for a newly minted
/// one. A missing, expired or undecodable record yields a fresh session with
/// an unused id, empty values and a new CSRF token, persisted immediately so
/// the anti-forgery token is established before any state-mutating request.
pub async fn get_or_create_session(
    headers: &HeaderMap,
) -> Result<(Session, HeaderMap), SessionError> {
    if let Some(session) = load_session(headers).await? {
        return Ok((session, HeaderMap::new()));
    }

    let session = new_session()?;
    save_session(&session).await?;
    let cookie_headers = issue_session_cookie(&session.id)?;
    tracing::debug!(session_id = %session.id, "session created");
    Ok((session, cookie_headers))
}

/// Look up the session bound to the request's cookie without creating one.
pub async fn load_session(headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
    let Some(session_id) = get_session_id_from_headers(headers) else {
        return Ok(None);
    };
    session_by_id(session_id).await
}

/// Look up a session record by id. Expired records are treated as absent and
/// removed when observed.
pub async fn session_by_id(session_id: &str) -> Result<Option<Session>, SessionError> {
    let cached = SESSION_CACHE_STORE
        .lock()
        .await
        .get(SESSION_PREFIX, session_id)
        .await
        .map_err(|e| SessionError::StoreUnavailable(e.to_string()))?;

    let Some(cached) = cached else {
        return Ok(None);
    };

    let record: StoredSession = match cached.try_into() {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(session_id, "dropping undecodable session record: {}", e);
            delete_session_record(session_id).await?;
            return Ok(None);
        }
    };

    if record.expires_at < Utc::now() {
        tracing::debug!(session_id, "session expired at {}", record.expires_at);
        delete_session_record(session_id).await?;
        return Ok(None);
    }

    Ok(Some(Session {
        id: session_id.to_string(),
        fresh: false,
        record,
    }))
}

/// Build a fresh session handle: unused id, empty values, new CSRF token.
/// Not persisted until saved.
pub(crate) fn new_session() -> Result<Session, SessionError> {
    let id = gen_random_string(32)?;
    let csrf_token = gen_random_string(32)?;
    let ttl = *SESSION_COOKIE_MAX_AGE;

    Ok(Session {
        id,
        fresh: true,
        record: StoredSession {
            values: SessionValues::default(),
            csrf_token,
            expires_at: Utc::now() + Duration::seconds(ttl as i64),
            ttl,
        },
    })
}

/// Persist the handle's record. One write of the whole record, so a
/// concurrent reader never observes a partially applied session.
pub async fn save_session(session: &Session) -> Result<(), SessionError> {
    SESSION_CACHE_STORE
        .lock()
        .await
        .put_with_ttl(
            SESSION_PREFIX,
            &session.id,
            session.record.clone().into(),
            session.record.ttl as usize,
        )
        .await
        .map_err(|e| SessionError::StoreUnavailable(e.to_string()))
}

/// Remove the session bound to the request's cookie and return headers that
/// clear the cookie. Idempotent: a missing cookie or absent record succeeds.
pub async fn destroy_session(headers: &HeaderMap) -> Result<HeaderMap, SessionError> {
    if let Some(session_id) = get_session_id_from_headers(headers) {
        delete_session_record(session_id).await?;
        tracing::debug!(session_id, "session destroyed");
    }
    clear_session_cookie()
}

pub(crate) async fn delete_session_record(session_id: &str) -> Result<(), SessionError> {
    SESSION_CACHE_STORE
        .lock()
        .await
        .remove(SESSION_PREFIX, session_id)
        .await
        .map_err(|e| SessionError::StoreUnavailable(e.to_string()))
}
