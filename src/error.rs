// Error handling module for the Garage API
// Provides the closed error taxonomy and its single mapping to HTTP responses

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::auth::AuthError;

/// Main error type for the API
/// All handlers return Result<T, ApiError>
///
/// Each variant maps to exactly one HTTP status code. The mapping lives in
/// `to_error_response` and nowhere else.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Field-level constraint violations
    /// Maps to HTTP 400 Bad Request with the violations as `details`
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// The request body could not be parsed at all
    /// Maps to HTTP 400 Bad Request
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// A uniqueness constraint was violated by the store
    /// Maps to HTTP 400 Bad Request with the raw store message
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// Authentication failures, see `AuthError` for the status mapping
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Resource not found by id or key
    /// Maps to HTTP 404 Not Found
    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    /// Database operation errors
    /// Maps to HTTP 500, details are logged and never sent to clients
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Internal server errors (filesystem, task join, ...)
    /// Maps to HTTP 500, details are logged and never sent to clients
    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON body of every error response
///
/// `details` is only present for validation failures.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_error_response();
        (status, Json(body)).into_response()
    }
}

impl ApiError {
    pub fn not_found(resource: &'static str) -> Self {
        ApiError::NotFound { resource }
    }

    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logging level follows severity:
    /// - error!: database and internal errors (500)
    /// - warn!: duplicate keys
    /// - debug!: expected client errors (validation, not found)
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::Validation(errors) => {
                debug!("Validation error: {:?}", errors);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation failed".to_string(),
                        details: Some(
                            serde_json::to_value(errors).unwrap_or_else(|_| serde_json::json!({})),
                        ),
                    },
                )
            }
            ApiError::MalformedBody(message) => {
                debug!("Malformed request body: {}", message);
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message.clone()))
            }
            ApiError::DuplicateKey(message) => {
                warn!("Duplicate key: {}", message);
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message.clone()))
            }
            ApiError::Auth(auth_error) => auth_error.to_error_response(),
            ApiError::NotFound { resource } => {
                debug!("{} not found", resource);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new(format!("{} not found", resource)),
                )
            }
            ApiError::Database(db_error) => {
                error!("Database error: {:?}", db_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("A database error occurred"),
                )
            }
            ApiError::Internal(message) => {
                error!("Internal error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("An internal server error occurred"),
                )
            }
        }
    }
}

/// Convert sqlx errors to ApiError
/// Unique constraint violations surface as DuplicateKey with the raw message
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &error {
            if db_err.is_unique_violation() {
                return ApiError::DuplicateKey(db_err.message().to_string());
            }
        }
        ApiError::Database(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        ApiError::MalformedBody(error.body_text())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(error: std::io::Error) -> Self {
        ApiError::Internal(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    fn status_of(error: ApiError) -> StatusCode {
        error.to_error_response().0
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(ApiError::Validation(ValidationErrors::new())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::DuplicateKey("dup".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::MalformedBody("bad query".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(ApiError::not_found("Car")), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(ApiError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ApiError::Auth(AuthError::MissingToken)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::Auth(AuthError::PasswordHash("oom".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_body_names_resource() {
        let (status, body) = ApiError::not_found("Brand").to_error_response();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "Brand not found");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_validation_body_carries_field_details() {
        let mut errors = ValidationErrors::new();
        errors.add("power", ValidationError::new("range"));

        let (status, body) = ApiError::Validation(errors).to_error_response();
        let details = body.details.expect("validation errors carry details");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(details.get("power").is_some());
    }

    #[test]
    fn test_internal_errors_are_sanitized() {
        let (_, body) = ApiError::Internal("disk on fire at /var/secret".into()).to_error_response();
        assert!(!body.error.contains("secret"));

        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("details").is_none());
    }
}
