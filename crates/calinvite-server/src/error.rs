//! Server error types.
//!
//! [`ServerError`] covers startup failures; [`ApiError`] is the per-request
//! error surfaced over the wire as plain text, matching the original
//! service's responses.

use std::io;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use calinvite_providers::{ProviderError, ProviderErrorCode};

/// Result type for server startup operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// IO error (listener bind, file access).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Provider setup error.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl ServerError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// A per-request error mapped to an HTTP status.
///
/// All errors are terminal per request: no retries, no backoff. Bodies are
/// plain text; structured error codes are not exposed over the wire.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing required request fields - 400.
    #[error("Missing required fields: {0}.")]
    Validation(String),

    /// No usable token, or the refresh exchange failed - 401.
    #[error("{0}")]
    AuthRequired(String),

    /// The authorization-code exchange was rejected - 500.
    #[error("Authentication failed.")]
    AuthExchangeFailed(String),

    /// Calendar or messaging API failure - 500.
    #[error("Error creating event.")]
    Downstream(String),

    /// Unexpected internal failure - 500.
    #[error("Internal server error.")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::AuthRequired(_) => StatusCode::UNAUTHORIZED,
            Self::AuthExchangeFailed(_) | Self::Downstream(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The detail message logged server-side but not sent to the caller.
    fn detail(&self) -> &str {
        match self {
            Self::Validation(detail)
            | Self::AuthRequired(detail)
            | Self::AuthExchangeFailed(detail)
            | Self::Downstream(detail)
            | Self::Internal(detail) => detail,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self.detail());
        } else {
            tracing::warn!("request rejected: {}", self.detail());
        }
        (status, self.to_string()).into_response()
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err.code() {
            ProviderErrorCode::AuthenticationFailed => Self::AuthRequired(err.to_string()),
            ProviderErrorCode::NetworkError
            | ProviderErrorCode::ServerError
            | ProviderErrorCode::InvalidResponse => Self::Downstream(err.to_string()),
            ProviderErrorCode::ConfigurationError => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        assert_eq!(
            ApiError::Validation("summary".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn auth_required_maps_to_401() {
        assert_eq!(
            ApiError::AuthRequired("no token".to_string()).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn exchange_and_downstream_map_to_500() {
        assert_eq!(
            ApiError::AuthExchangeFailed("rejected".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Downstream("calendar 503".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn provider_auth_error_becomes_auth_required() {
        let err: ApiError = ProviderError::authentication("refresh rejected").into();
        assert!(matches!(err, ApiError::AuthRequired(_)));
    }

    #[test]
    fn provider_server_error_becomes_downstream() {
        let err: ApiError = ProviderError::server("calendar 500").into();
        assert!(matches!(err, ApiError::Downstream(_)));
    }
}
