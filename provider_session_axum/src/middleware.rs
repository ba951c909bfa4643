use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::header::HeaderValue;

use provider_session::{CSRF_HEADER, get_or_create_session, verify_csrf};

use super::session::AuthUser;

/// Echo the session's CSRF token so clients can pick it up for later
/// state-changing requests.
fn add_csrf_header(mut response: Response, csrf_token: &str) -> Response {
    if let Ok(header_value) = HeaderValue::from_str(csrf_token) {
        response.headers_mut().insert(CSRF_HEADER, header_value);
    } else {
        tracing::error!("Failed to create CSRF header value from token");
    }
    response
}

/// Access guard for protected routes.
///
/// Every request gets a session: a cookieless or stale request is given a new
/// anonymous one, whose `Set-Cookie` rides on the response either way. Only
/// authenticated sessions are admitted; everything else is a uniform 401.
/// State-changing methods must additionally carry the session's CSRF token in
/// `X-CSRF-Token`, or the request is refused with 403 before the handler runs.
/// Admitted requests see [`AuthUser`] in their extensions, and the response
/// carries the token in `X-CSRF-Token`.
pub async fn require_session(mut req: Request, next: Next) -> Response {
    let (session, cookie_headers) = match get_or_create_session(req.headers()).await {
        Ok(established) => established,
        Err(e) => {
            tracing::error!("Failed to establish session: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    };

    if !session.is_authenticated() {
        let mut response = (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        response.headers_mut().extend(cookie_headers);
        return add_csrf_header(response, session.csrf_token());
    }

    if let Err(e) = verify_csrf(&session, req.headers(), req.method()) {
        return (StatusCode::FORBIDDEN, e.to_string()).into_response();
    }

    let Some(auth_user) = AuthUser::from_session(&session) else {
        tracing::error!(session_id = %session.id(), "authenticated session missing user values");
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    };

    let csrf_token = session.csrf_token().to_string();
    req.extensions_mut().insert(auth_user);

    let response = next.run(req).await;
    add_csrf_header(response, &csrf_token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, middleware::from_fn, routing::get};
    use http::{
        Request,
        header::{COOKIE, SET_COOKIE},
    };
    use serial_test::serial;
    use tower::ServiceExt;

    use provider_session::{KEY_USER_ID, session_by_id};

    use crate::test_utils::{login, session_cookie, session_id_from_set_cookie};

    async fn whoami(user: AuthUser) -> String {
        user.user_id
    }

    fn protected_app() -> Router {
        Router::new()
            .route("/protected", get(whoami).post(whoami))
            .layer(from_fn(require_session))
    }

    #[tokio::test]
    #[serial]
    async fn test_guard_rejects_anonymous_but_mints_a_session_cookie() {
        let request = Request::builder()
            .uri("/protected")
            .body(Body::empty())
            .expect("valid request");
        let response = protected_app().oneshot(request).await.expect("run app");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key(SET_COOKIE));
        assert!(response.headers().contains_key(CSRF_HEADER));

        // The minted session exists but never carries an authenticated user
        let session_id = session_id_from_set_cookie(response.headers());
        let session = session_by_id(&session_id)
            .await
            .expect("lookup")
            .expect("record present");
        assert!(!session.is_authenticated());
        assert_eq!(session.get(KEY_USER_ID), None);
    }

    #[tokio::test]
    #[serial]
    async fn test_guard_admits_authenticated_session() {
        let (session_id, user_id) = login().await;

        let request = Request::builder()
            .uri("/protected")
            .header(COOKIE, session_cookie(&session_id))
            .body(Body::empty())
            .expect("valid request");
        let response = protected_app().oneshot(request).await.expect("run app");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(CSRF_HEADER));

        let body = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("read body");
        assert_eq!(&body[..], user_id.as_bytes());
    }

    #[tokio::test]
    #[serial]
    async fn test_guard_enforces_csrf_on_mutating_methods() {
        let (session_id, _) = login().await;
        let cookie = session_cookie(&session_id);

        let request = Request::builder()
            .method(http::Method::POST)
            .uri("/protected")
            .header(COOKIE, &cookie)
            .body(Body::empty())
            .expect("valid request");
        let response = protected_app().oneshot(request).await.expect("run app");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let session = session_by_id(&session_id)
            .await
            .expect("lookup")
            .expect("record present");
        let request = Request::builder()
            .method(http::Method::POST)
            .uri("/protected")
            .header(COOKIE, &cookie)
            .header(CSRF_HEADER, session.csrf_token())
            .body(Body::empty())
            .expect("valid request");
        let response = protected_app().oneshot(request).await.expect("run app");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    #[serial]
    async fn test_guard_rejects_stale_cookie_with_replacement_session() {
        let request = Request::builder()
            .uri("/protected")
            .header(COOKIE, session_cookie("long-gone"))
            .body(Body::empty())
            .expect("valid request");
        let response = protected_app().oneshot(request).await.expect("run app");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let replacement_id = session_id_from_set_cookie(response.headers());
        assert_ne!(replacement_id, "long-gone");
    }
}
