use async_trait::async_trait;
use thiserror::Error;

/// Identity asserted by an external provider after a completed handshake.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalIdentity {
    /// Provider-scoped stable subject identifier.
    pub external_id: String,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider rejected or could not complete the handshake.
    #[error("Handshake failed: {0}")]
    Handshake(String),

    /// The provider could not be reached.
    #[error("Provider unreachable: {0}")]
    Unreachable(String),

    /// The user declined authorization at the provider.
    #[error("Authorization denied: {0}")]
    Denied(String),
}

/// Seam to the external identity provider.
///
/// `begin_auth` returns the absolute URL the browser is redirected to;
/// `complete_auth` consumes the callback query string and yields the verified
/// identity. Implementations own all provider-specific wire details.
#[async_trait]
pub trait IdentityVerifier: Send + Sync + 'static {
    async fn begin_auth(&self, provider: &str) -> Result<String, IdentityError>;

    async fn complete_auth(
        &self,
        provider: &str,
        callback_params: &str,
    ) -> Result<ExternalIdentity, IdentityError>;
}
