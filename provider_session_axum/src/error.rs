use http::{Result as HttpResult, StatusCode};
use provider_session::FlowError;

/// Converts errors to the `(StatusCode, String)` response shape handlers use.
pub(crate) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Maps flow failures to status codes. Server-side failures respond with a
/// generic body; the detail stays in the log.
impl<T> IntoResponseError<T> for Result<T, FlowError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| match e {
            FlowError::UnknownProvider(_) => (StatusCode::BAD_REQUEST, e.to_string()),
            FlowError::AuthenticationFailed(_) => (StatusCode::UNAUTHORIZED, e.to_string()),
            FlowError::Unauthorized => (StatusCode::UNAUTHORIZED, e.to_string()),
            FlowError::CsrfRejected(_) => (StatusCode::FORBIDDEN, e.to_string()),
            FlowError::DirectoryFailure(_)
            | FlowError::SessionPersistFailed(_)
            | FlowError::StoreUnavailable(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        })
    }
}

/// Implementation for http::Error (used by Response::builder())
impl<T> IntoResponseError<T> for HttpResult<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: FlowError) -> StatusCode {
        let result: Result<(), FlowError> = Err(err);
        result.into_response_error().unwrap_err().0
    }

    #[test]
    fn test_unknown_provider_is_bad_request() {
        let status = status_of(FlowError::UnknownProvider("gitlab".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_authentication_failures_are_unauthorized() {
        let status = status_of(FlowError::AuthenticationFailed("denied".to_string()));
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(FlowError::Unauthorized), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_csrf_rejection_is_forbidden() {
        let status = status_of(FlowError::CsrfRejected("mismatch".to_string()));
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_server_side_failures_hide_detail() {
        for err in [
            FlowError::DirectoryFailure("db gone".to_string()),
            FlowError::SessionPersistFailed("write failed".to_string()),
            FlowError::StoreUnavailable("redis gone".to_string()),
        ] {
            let result: Result<(), FlowError> = Err(err);
            let (status, body) = result.into_response_error().unwrap_err();
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "Internal server error");
        }
    }

    #[test]
    fn test_success_passes_through() {
        let result: Result<&str, FlowError> = Ok("ok");
        assert_eq!(result.into_response_error().expect("ok value"), "ok");
    }
}
