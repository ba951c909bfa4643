use axum::{
    RequestPartsExt,
    extract::{FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Response},
};
use axum_extra::{TypedHeader, headers};
use http::{StatusCode, request::Parts};

use provider_session::{
    KEY_PROVIDER, KEY_USER_EMAIL, KEY_USER_ID, SESSION_COOKIE_NAME, Session, SessionError,
    session_by_id, verify_csrf,
};

/// Rejection for unauthenticated or forged requests.
///
/// Anything short of a live authenticated session answers a uniform 401, so
/// a probing client cannot distinguish a missing cookie from a stale or
/// unauthenticated one. A CSRF mismatch on a live session is 403.
#[derive(Debug)]
pub enum AuthRejection {
    Unauthorized,
    CsrfRejected(String),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            Self::CsrfRejected(msg) => (StatusCode::FORBIDDEN, msg).into_response(),
        }
    }
}

impl From<SessionError> for AuthRejection {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::CsrfRejected(msg) => Self::CsrfRejected(msg),
            _ => Self::Unauthorized,
        }
    }
}

/// Authenticated user information, available as an Axum extractor.
///
/// As an extractor it resolves the session cookie, requires the session to be
/// authenticated, and enforces the `X-CSRF-Token` header on state-changing
/// methods (POST, PUT, DELETE, PATCH). Behind [`require_session`] it is read
/// from request extensions instead, so the store is hit once per request.
///
/// [`require_session`]: crate::require_session
#[derive(Clone, Debug)]
pub struct AuthUser {
    /// Stable internal user id
    pub user_id: String,
    /// Email asserted by the provider at last login
    pub email: String,
    /// Provider that authenticated this session
    pub provider: String,
    /// Id of the backing session
    pub session_id: String,
    /// CSRF token bound to the session
    pub csrf_token: String,
    /// True only in the request cycle that established the session
    pub fresh: bool,
}

impl AuthUser {
    /// Build from an authenticated session. Returns `None` when any of the
    /// authenticated values is missing.
    pub(crate) fn from_session(session: &Session) -> Option<Self> {
        Some(Self {
            user_id: session.get(KEY_USER_ID)?.to_string(),
            email: session.get(KEY_USER_EMAIL)?.to_string(),
            provider: session.get(KEY_PROVIDER)?.to_string(),
            session_id: session.id().to_string(),
            csrf_token: session.csrf_token().to_string(),
            fresh: session.fresh(),
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let method = parts.method.clone();
        let cookies: TypedHeader<headers::Cookie> = parts.extract().await.map_err(|_| {
            tracing::debug!("Failed to extract cookies");
            AuthRejection::Unauthorized
        })?;

        let session_id = cookies
            .get(SESSION_COOKIE_NAME.as_str())
            .ok_or(AuthRejection::Unauthorized)?;

        let session = session_by_id(session_id)
            .await?
            .ok_or(AuthRejection::Unauthorized)?;

        if !session.is_authenticated() {
            return Err(AuthRejection::Unauthorized);
        }

        verify_csrf(&session, &parts.headers, &method)?;

        AuthUser::from_session(&session).ok_or(AuthRejection::Unauthorized)
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(<Self as FromRequestParts<S>>::from_request_parts(parts, state)
            .await
            .ok())
    }
}
