use async_trait::async_trait;

use provider_session::{ExternalIdentity, IdentityError, IdentityVerifier};

/// Development stand-in for a real provider: the login redirect bounces
/// straight back to the callback, carrying the identity in query parameters.
/// Never use outside local development.
pub(crate) struct DevVerifier;

#[async_trait]
impl IdentityVerifier for DevVerifier {
    async fn begin_auth(&self, provider: &str) -> Result<String, IdentityError> {
        Ok(format!(
            "/auth/callback/{provider}?subject=dev-user&email=dev%40example.com"
        ))
    }

    async fn complete_auth(
        &self,
        _provider: &str,
        callback_params: &str,
    ) -> Result<ExternalIdentity, IdentityError> {
        let subject = query_param(callback_params, "subject")
            .ok_or_else(|| IdentityError::Handshake("missing subject".to_string()))?;
        let email = query_param(callback_params, "email")
            .ok_or_else(|| IdentityError::Handshake("missing email".to_string()))?;

        Ok(ExternalIdentity {
            external_id: subject.to_string(),
            email: email.replace("%40", "@"),
        })
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

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_callback_params_round_trip() {
        let url = DevVerifier.begin_auth("google").await.expect("begin");
        let query = url.split('?').nth(1).expect("query string");

        let identity = DevVerifier
            .complete_auth("google", query)
            .await
            .expect("complete");
        assert_eq!(identity.external_id, "dev-user");
        assert_eq!(identity.email, "dev@example.com");
    }

    #[tokio::test]
    async fn test_missing_params_fail_the_handshake() {
        let result = DevVerifier.complete_auth("google", "subject=dev-user").await;
        assert!(matches!(result, Err(IdentityError::Handshake(_))));
    }
}
