use thiserror::Error;

use crate::identity::IdentityError;
use crate::session::SessionError;
use crate::userdb::UserError;

/// Failures surfaced by the login flow. Server-side failures carry a detail
/// string for the log; what reaches the client is decided by the HTTP layer.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("User directory failure: {0}")]
    DirectoryFailure(String),

    #[error("Failed to persist session: {0}")]
    SessionPersistFailed(String),

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("CSRF rejected: {0}")]
    CsrfRejected(String),

    /// Access-guard rejection. Not raised by the flow itself; guards built on
    /// this crate reject before the flow runs and map their rejection through
    /// the same status table as this variant.
    #[error("Unauthorized")]
    Unauthorized,
}

impl FlowError {
    /// Log at a severity matching the failure class, then pass the error on.
    pub(crate) fn log(self) -> Self {
        match &self {
            Self::DirectoryFailure(_)
            | Self::SessionPersistFailed(_)
            | Self::StoreUnavailable(_) => tracing::error!("{}", self),
            _ => tracing::debug!("{}", self),
        }
        self
    }
}

impl From<IdentityError> for FlowError {
    fn from(err: IdentityError) -> Self {
        Self::AuthenticationFailed(err.to_string()).log()
    }
}

impl From<UserError> for FlowError {
    fn from(err: UserError) -> Self {
        Self::DirectoryFailure(err.to_string()).log()
    }
}

impl From<SessionError> for FlowError {
    fn from(err: SessionError) -> Self {
        let mapped = match err {
            SessionError::CsrfRejected(msg) => Self::CsrfRejected(msg),
            SessionError::StoreUnavailable(msg) | SessionError::InvalidRecord(msg) => {
                Self::StoreUnavailable(msg)
            }
            SessionError::Utils(e) => Self::StoreUnavailable(e.to_string()),
        };
        mapped.log()
    }
}
