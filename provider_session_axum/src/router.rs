use axum::{
    Json, Router,
    extract::{Path, RawQuery, State},
    response::{IntoResponse, Redirect},
    routing::get,
};
use http::{HeaderMap, StatusCode};
use std::sync::Arc;

use provider_session::{AuthFlow, LoginSummary};

use super::error::IntoResponseError;

/// Routes for the login lifecycle, to be merged into the application router:
/// `/login/{provider}`, `/auth/callback/{provider}` and `/logout`.
pub fn auth_router(flow: Arc<AuthFlow>) -> Router {
    Router::new()
        .route("/login/{provider}", get(login))
        .route("/auth/callback/{provider}", get(callback))
        .route("/logout", get(logout))
        .with_state(flow)
}

async fn login(
    State(flow): State<Arc<AuthFlow>>,
    Path(provider): Path<String>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Redirect), (StatusCode, String)> {
    let (url, cookie_headers) = flow
        .begin_login(&provider, &headers)
        .await
        .into_response_error()?;
    Ok((cookie_headers, Redirect::temporary(&url)))
}

async fn callback(
    State(flow): State<Arc<AuthFlow>>,
    Path(provider): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<LoginSummary>), (StatusCode, String)> {
    let (summary, cookie_headers) = flow
        .handle_callback(&provider, query.as_deref().unwrap_or(""), &headers)
        .await
        .into_response_error()?;
    Ok((cookie_headers, Json(summary)))
}

async fn logout(
    State(flow): State<Arc<AuthFlow>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let cleared = flow
        .logout(&headers, query.as_deref().unwrap_or(""))
        .await
        .into_response_error()?;
    Ok((cleared, Redirect::to(flow.post_logout_redirect())))
}
