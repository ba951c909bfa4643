use http::header::{COOKIE, HeaderMap};

use crate::session::config::{SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME};
use crate::session::errors::SessionError;
use crate::utils::header_set_cookie;

/// Extract the session id from the request's Cookie header, if present.
/// A header that does not decode as a string is client garbage, treated the
/// same as no cookie at all.
pub(crate) fn get_session_id_from_headers(headers: &HeaderMap) -> Option<&str> {
    let Some(cookie_header) = headers.get(COOKIE) else {
        tracing::trace!("No cookie header found");
        return None;
    };

    let Ok(cookie_str) = cookie_header.to_str() else {
        tracing::debug!("Ignoring undecodable cookie header");
        return None;
    };

    let cookie_name = SESSION_COOKIE_NAME.as_str();
    cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
        let mut parts = s.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == cookie_name => Some(v),
            _ => None,
        }
    })
}

/// Headers that bind the given session id to the browser.
pub(crate) fn issue_session_cookie(session_id: &str) -> Result<HeaderMap, SessionError> {
    let mut headers = HeaderMap::new();
    header_set_cookie(
        &mut headers,
        SESSION_COOKIE_NAME.as_str(),
        session_id,
        *SESSION_COOKIE_MAX_AGE as i64,
    )?;
    Ok(headers)
}

/// Headers that instruct the browser to drop the session cookie.
pub(crate) fn clear_session_cookie() -> Result<HeaderMap, SessionError> {
    let mut headers = HeaderMap::new();
    header_set_cookie(&mut headers, SESSION_COOKIE_NAME.as_str(), "", -86400)?;
    Ok(headers)
}
