// Authentication error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::error::ErrorResponse;

/// The only message an Auth Gate rejection ever carries.
/// Every gate stage collapses into this body so callers cannot tell which check failed.
pub const NOT_AUTHORIZED_MESSAGE: &str = "You are not authorized to perform this operation";

/// Message for a failed login, shared by unknown email and wrong password
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Authentication error types
///
/// The variants keep the failing stage for logging only.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    // Auth Gate stages
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("token has expired")]
    ExpiredToken,
    #[error("token identity does not resolve to a user")]
    UnknownIdentity,
    #[error("user lookup failed: {0}")]
    LookupFailed(String),

    // Login
    #[error("invalid email or password")]
    InvalidCredentials,

    // Server side failures
    #[error("token generation error: {0}")]
    TokenGeneration(String),
    #[error("password hashing error: {0}")]
    PasswordHash(String),
}

impl AuthError {
    /// True for every failure that happens inside the Auth Gate
    pub fn is_gate_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken
                | AuthError::InvalidToken
                | AuthError::ExpiredToken
                | AuthError::UnknownIdentity
                | AuthError::LookupFailed(_)
        )
    }

    pub(crate) fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        match self {
            AuthError::LookupFailed(msg) => {
                error!("Auth Gate rejected request, user lookup failed: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new(NOT_AUTHORIZED_MESSAGE),
                )
            }
            gate if gate.is_gate_rejection() => {
                warn!("Auth Gate rejected request: {}", gate);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new(NOT_AUTHORIZED_MESSAGE),
                )
            }
            AuthError::InvalidCredentials => {
                warn!("Login attempt with invalid credentials");
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new(INVALID_CREDENTIALS_MESSAGE),
                )
            }
            other => {
                error!("Authentication failure: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("An internal server error occurred"),
                )
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_error_response();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_gate_stage_yields_identical_body() {
        let stages = vec![
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::ExpiredToken,
            AuthError::UnknownIdentity,
            AuthError::LookupFailed("connection reset".to_string()),
        ];

        for stage in stages {
            let (status, body) = stage.to_error_response();
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body.error, NOT_AUTHORIZED_MESSAGE);
            assert!(body.details.is_none());
        }
    }

    #[test]
    fn test_server_side_failures_are_500() {
        for failure in [
            AuthError::TokenGeneration("bad key".into()),
            AuthError::PasswordHash("oom".into()),
        ] {
            let (status, body) = failure.to_error_response();
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(!body.error.contains("oom"));
        }
        assert!(!AuthError::PasswordHash("oom".into()).is_gate_rejection());
    }

    #[test]
    fn test_invalid_credentials_message() {
        let (status, body) = AuthError::InvalidCredentials.to_error_response();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error, INVALID_CREDENTIALS_MESSAGE);
    }
}
