//! provider-session - session lifecycle for third-party provider login
//!
//! This crate owns the path from an anonymous browser, through a provider
//! redirect and callback, to an authenticated cookie-bound session, and back
//! to anonymous on logout. The provider handshake itself and the user store
//! are collaborator seams ([`IdentityVerifier`], [`UserDirectory`]); this
//! crate consumes their results and keeps the session state trustworthy:
//! CSRF tokens minted with every session, atomic writes of the authenticated
//! triple, and session renewal on login.

mod flow;
mod identity;
mod session;
mod storage;
mod userdb;
mod utils;

pub use flow::{AuthFlow, FlowConfig, FlowError, LoginSummary};
pub use identity::{ExternalIdentity, IdentityError, IdentityVerifier};
pub use session::{
    CSRF_HEADER, KEY_PROVIDER, KEY_USER_EMAIL, KEY_USER_ID, KEY_WORKSPACE_ID, KEY_WORKSPACE_NAME,
    SESSION_COOKIE_MAX_AGE, SESSION_COOKIE_NAME, Session, SessionError, SessionValues,
    destroy_session, get_or_create_session, load_session, save_session, session_by_id,
    verify_csrf, verify_csrf_token,
};
pub use userdb::{MemoryUserDirectory, SqliteUserDirectory, User, UserDirectory, UserError};

/// Initialize the session store backend.
///
/// Touches the store so a misconfigured backend fails at startup rather than
/// on the first request.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    storage::init().await?;
    Ok(())
}
