use async_trait::async_trait;
use std::sync::Arc;

use provider_session::{
    AuthFlow, ExternalIdentity, FlowConfig, IdentityError, IdentityVerifier, MemoryUserDirectory,
    SESSION_COOKIE_NAME,
};

pub(crate) struct StubVerifier;

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn begin_auth(&self, provider: &str) -> Result<String, IdentityError> {
        Ok(format!("https://idp.example/{provider}/authorize"))
    }

    async fn complete_auth(
        &self,
        _provider: &str,
        _callback_params: &str,
    ) -> Result<ExternalIdentity, IdentityError> {
        Ok(ExternalIdentity {
            external_id: "42".to_string(),
            email: "a@b.com".to_string(),
        })
    }
}

pub(crate) fn test_flow() -> AuthFlow {
    AuthFlow::new(
        FlowConfig::new(["google"]),
        Arc::new(StubVerifier),
        Arc::new(MemoryUserDirectory::new()),
    )
}

/// Complete a stub login; returns the new session id and internal user id.
pub(crate) async fn login() -> (String, String) {
    let (summary, cookie_headers) = test_flow()
        .handle_callback("google", "", &http::HeaderMap::new())
        .await
        .expect("login");
    (session_id_from_set_cookie(&cookie_headers), summary.user_id)
}

pub(crate) fn session_id_from_set_cookie(headers: &http::HeaderMap) -> String {
    let cookie = headers
        .get(http::header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .expect("valid header value");
    let pair = cookie.split(';').next().expect("cookie pair");
    pair.splitn(2, '=').nth(1).expect("cookie value").to_string()
}

pub(crate) fn session_cookie(session_id: &str) -> String {
    format!("{}={}", SESSION_COOKIE_NAME.as_str(), session_id)
}
