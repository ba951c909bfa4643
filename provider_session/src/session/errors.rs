use thiserror::Error;

use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum SessionError {
    /// The session backend could not be reached or refused the operation.
    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    /// Missing or invalid anti-forgery token on a state-mutating request.
    #[error("CSRF rejected: {0}")]
    CsrfRejected(String),

    #[error("Invalid session record: {0}")]
    InvalidRecord(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
