use axum::{Json, response::Html};
use http::StatusCode;
use serde_json::{Value, json};

use provider_session::{KEY_WORKSPACE_ID, KEY_WORKSPACE_NAME, session_by_id};
use provider_session_axum::AuthUser;

pub(crate) async fn index() -> Html<&'static str> {
    Html(
        r#"<h1>Ideas</h1>
<p><a href="/login/google">Sign in with Google</a></p>
<p><a href="/login/github">Sign in with GitHub</a></p>
<p><a href="/api/me">Who am I?</a> | <a href="/api/v1/ideas">My ideas</a></p>"#,
    )
}

pub(crate) async fn me(user: AuthUser) -> Result<Json<Value>, (StatusCode, String)> {
    let session = session_by_id(&user.session_id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))?;

    Ok(Json(json!({
        "page": "me",
        "userID": user.user_id,
        "userEmail": user.email,
        "provider": user.provider,
        "workspaceID": session.get(KEY_WORKSPACE_ID),
        "workspaceName": session.get(KEY_WORKSPACE_NAME),
        "fresh": user.fresh,
        "sessionKeys": session.keys(),
    })))
}

pub(crate) async fn list_ideas(user: AuthUser) -> Json<Value> {
    Json(json!({
        "owner": user.email,
        "ideas": [
            { "id": 1, "title": "Offline-first sync" },
            { "id": 2, "title": "Keyboard-only navigation" },
        ],
    }))
}
