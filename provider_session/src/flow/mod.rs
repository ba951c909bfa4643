mod errors;

pub use errors::FlowError;

use http::header::HeaderMap;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::identity::IdentityVerifier;
use crate::session::{
    CSRF_HEADER, delete_session_record, destroy_session, get_or_create_session,
    get_session_id_from_headers, issue_session_cookie, load_session, new_session, save_session,
    verify_csrf_token,
};
use crate::userdb::UserDirectory;

/// Static configuration of the login flow.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    providers: HashSet<String>,
    post_logout_redirect: String,
}

impl FlowConfig {
    pub fn new<I, S>(providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            providers: providers.into_iter().map(Into::into).collect(),
            post_logout_redirect: "/".to_string(),
        }
    }

    pub fn with_post_logout_redirect(mut self, target: impl Into<String>) -> Self {
        self.post_logout_redirect = target.into();
        self
    }
}

/// Outcome of a completed login, suitable for returning to the client.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSummary {
    pub user_id: String,
    pub email: String,
    pub provider: String,
    pub fresh: bool,
}

/// Orchestrates provider login, session establishment and logout over the
/// pluggable verifier and directory seams.
pub struct AuthFlow {
    config: FlowConfig,
    verifier: Arc<dyn IdentityVerifier>,
    directory: Arc<dyn UserDirectory>,
}

impl AuthFlow {
    pub fn new(
        config: FlowConfig,
        verifier: Arc<dyn IdentityVerifier>,
        directory: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            config,
            verifier,
            directory,
        }
    }

    pub fn post_logout_redirect(&self) -> &str {
        &self.config.post_logout_redirect
    }

    fn ensure_provider(&self, provider: &str) -> Result<(), FlowError> {
        if self.config.providers.contains(provider) {
            Ok(())
        } else {
            Err(FlowError::UnknownProvider(provider.to_string()).log())
        }
    }

    /// Start a login against the named provider. Returns the URL the browser
    /// should be redirected to, plus any cookie headers for the caller to
    /// emit.
    ///
    /// A session is established before the provider round trip, so the
    /// browser holds a CSRF-capable session by the time it returns.
    pub async fn begin_login(
        &self,
        provider: &str,
        headers: &HeaderMap,
    ) -> Result<(String, HeaderMap), FlowError> {
        self.ensure_provider(provider)?;
        let (_, cookie_headers) = get_or_create_session(headers).await?;
        let url = self.verifier.begin_auth(provider).await?;
        tracing::debug!(provider, "login started");
        Ok((url, cookie_headers))
    }

    /// Complete a provider callback: verify the asserted identity, upsert the
    /// user, and bind an authenticated session to the browser.
    ///
    /// The session id is always renewed: a new record carrying the
    /// authenticated values is written under a new id before the record bound
    /// to the incoming cookie (if any) is dropped. A failed write therefore
    /// leaves the prior session untouched, and a reader of either record only
    /// ever sees the full authenticated triple or none of it.
    pub async fn handle_callback(
        &self,
        provider: &str,
        callback_params: &str,
        headers: &HeaderMap,
    ) -> Result<(LoginSummary, HeaderMap), FlowError> {
        self.ensure_provider(provider)?;

        let identity = self.verifier.complete_auth(provider, callback_params).await?;
        let user = self
            .directory
            .upsert_user(provider, &identity.external_id, &identity.email)
            .await?;

        let mut session = new_session()?;
        session.authenticate(&user.id, &user.email, provider);
        save_session(&session)
            .await
            .map_err(|e| FlowError::SessionPersistFailed(e.to_string()).log())?;

        if let Some(old_id) = get_session_id_from_headers(headers) {
            if old_id != session.id() {
                delete_session_record(old_id).await?;
            }
        }

        let cookie_headers = issue_session_cookie(session.id())?;
        tracing::info!(provider, user_id = %user.id, "login completed");

        Ok((
            LoginSummary {
                user_id: user.id,
                email: user.email,
                provider: provider.to_string(),
                fresh: session.fresh(),
            },
            cookie_headers,
        ))
    }

    /// Tear down the session bound to the request and return headers that
    /// clear the cookie.
    ///
    /// Logout mutates state over GET, so it is token-gated: the caller must
    /// present the session's CSRF token in the `X-CSRF-Token` header or a
    /// `csrf_token` query parameter. Requests without a live session succeed
    /// unconditionally, making logout idempotent.
    pub async fn logout(&self, headers: &HeaderMap, query: &str) -> Result<HeaderMap, FlowError> {
        if let Some(session) = load_session(headers).await? {
            let header_token = headers.get(CSRF_HEADER).and_then(|h| h.to_str().ok());
            let presented = header_token
                .or_else(|| query_param(query, "csrf_token"))
                .ok_or_else(|| {
                    FlowError::CsrfRejected("missing logout CSRF token".to_string()).log()
                })?;
            verify_csrf_token(&session, presented)?;
        }

        let cleared = destroy_session(headers).await?;
        tracing::debug!("logout completed");
        Ok(cleared)
    }
}

fn query_param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query.split('&').find_map(|pair| {
        let mut parts = pair.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == name => Some(v),
            _ => None,
        }
    })
}
