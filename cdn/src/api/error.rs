use tfadapter::RemoteError;
use thiserror::Error;

use super::common::ApiErrorDetails;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error (HTTP {status}): {message}")]
    ApiError {
        status: u16,
        message: String,
        #[source]
        details: Option<Box<ApiErrorDetails>>,
    },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Authentication failed")]
    AuthError,

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::ApiError { status, .. } => Some(*status),
            ApiError::AuthError => Some(401),
            _ => None,
        }
    }

    /// Worth another attempt for idempotent requests
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::ApiError { status, .. } => *status == 429 || *status >= 500,
            ApiError::Timeout(_) | ApiError::ServiceUnavailable(_) => true,
            _ => false,
        }
    }
}

impl From<ApiError> for RemoteError {
    fn from(err: ApiError) -> Self {
        match err.status() {
            Some(404) => RemoteError::NotFound(err.to_string()),
            Some(409) | Some(412) => RemoteError::Conflict(err.to_string()),
            _ if err.is_transient() => RemoteError::Transient(err.to_string()),
            _ => RemoteError::Other(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> ApiError {
        ApiError::ApiError {
            status,
            message: format!("status {}", status),
            details: None,
        }
    }

    #[test]
    fn statuses_map_to_remote_error_kinds() {
        assert!(matches!(RemoteError::from(status(404)), RemoteError::NotFound(_)));
        assert!(matches!(RemoteError::from(status(409)), RemoteError::Conflict(_)));
        assert!(matches!(RemoteError::from(status(412)), RemoteError::Conflict(_)));
        assert!(matches!(RemoteError::from(status(429)), RemoteError::Transient(_)));
        assert!(matches!(RemoteError::from(status(503)), RemoteError::Transient(_)));
        assert!(matches!(RemoteError::from(status(400)), RemoteError::Other(_)));
        assert!(matches!(RemoteError::from(ApiError::AuthError), RemoteError::Other(_)));
        assert!(matches!(RemoteError::from(ApiError::Timeout(30)), RemoteError::Transient(_)));
    }

    #[test]
    fn remote_error_keeps_status_in_message() {
        let remote = RemoteError::from(status(500));
        assert!(remote.to_string().contains("HTTP 500"));
    }
}
