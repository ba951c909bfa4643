use http::{HeaderMap, Method};
use subtle::ConstantTimeEq;

use crate::session::errors::SessionError;
use crate::session::types::Session;

/// Request header carrying the anti-forgery token.
pub const CSRF_HEADER: &str = "X-CSRF-Token";

/// Verify the anti-forgery token for state-mutating methods.
///
/// POST, PUT, DELETE and PATCH requests must present `X-CSRF-Token` matching
/// the token bound to the session. Other methods pass unchecked; the one
/// state-mutating GET route (logout) is token-gated by the flow controller.
pub fn verify_csrf(
    session: &Session,
    headers: &HeaderMap,
    method: &Method,
) -> Result<(), SessionError> {
    if method != Method::POST
        && method != Method::PUT
        && method != Method::DELETE
        && method != Method::PATCH
    {
        return Ok(());
    }

    let presented = headers
        .get(CSRF_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| SessionError::CsrfRejected("missing X-CSRF-Token header".to_string()))?;

    verify_csrf_token(session, presented)
}

/// Constant-time comparison of a presented token against the session's token.
pub fn verify_csrf_token(session: &Session, presented: &str) -> Result<(), SessionError> {
    if presented
        .as_bytes()
        .ct_eq(session.csrf_token().as_bytes())
        .into()
    {
        Ok(())
    } else {
        tracing::debug!(session_id = %session.id(), "CSRF token mismatch");
        Err(SessionError::CsrfRejected("CSRF token mismatch".to_string()))
    }
}
