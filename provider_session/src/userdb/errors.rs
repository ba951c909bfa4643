use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
