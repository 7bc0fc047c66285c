//! Universal error handling for the API

use aide::OperationOutput;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catalog_storage::{perfume::PerfumeStorageError, user_account::UserAccountStorageError};
use schemars::JsonSchema;
use serde::Serialize;

use crate::jwt::JwtError;
use crate::password::PasswordError;
use crate::photo_storage::PhotoStorageError;

/// API error response envelope
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    /// Whether the client should retry the request
    pub allow_retry: bool,
    /// Error details
    error: ErrorBody,
}

/// Error body containing code and message
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    /// Machine-readable error code
    pub code: &'static str,
    /// Human-readable error message
    pub message: &'static str,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Create a new application error
    #[must_use]
    pub const fn new(
        status: StatusCode,
        code: &'static str,
        msg: &'static str,
        retry: bool,
    ) -> Self {
        Self {
            status,
            inner: ApiErrorResponse {
                allow_retry: retry,
                error: ErrorBody { code, message: msg },
            },
        }
    }

    /// Internal server error with a generic message
    #[must_use]
    pub const fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Internal server error",
            true,
        )
    }

    /// Service unavailable due to a storage backend failure
    #[must_use]
    pub const fn upstream() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "upstream_error",
            "Storage service temporarily unavailable",
            true,
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error based on status code
        match self.status.as_u16() {
            400..=499 => tracing::warn!(
                "Client error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            500..=599 => tracing::error!(
                "Server error: {} - {}",
                self.inner.error.code,
                self.inner.error.message
            ),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Convert user account storage errors to application errors
impl From<UserAccountStorageError> for AppError {
    fn from(err: UserAccountStorageError) -> Self {
        match &err {
            UserAccountStorageError::EmailTaken => Self::new(
                StatusCode::BAD_REQUEST,
                "email_taken",
                "An account with this email already exists",
                false,
            ),
            UserAccountStorageError::SerializationError(msg) => {
                tracing::error!("User account serialization error: {msg}");
                Self::internal()
            }
            _ => {
                tracing::error!("User account storage error: {err}");
                Self::upstream()
            }
        }
    }
}

/// Convert perfume storage errors to application errors
impl From<PerfumeStorageError> for AppError {
    fn from(err: PerfumeStorageError) -> Self {
        match &err {
            PerfumeStorageError::SerializationError(msg) => {
                tracing::error!("Perfume serialization error: {msg}");
                Self::internal()
            }
            _ => {
                tracing::error!("Perfume storage error: {err}");
                Self::upstream()
            }
        }
    }
}

/// Convert photo storage errors to application errors
impl From<PhotoStorageError> for AppError {
    fn from(err: PhotoStorageError) -> Self {
        use PhotoStorageError::{AwsError, ObjectNotFound, S3Error, UpstreamError};

        match &err {
            ObjectNotFound(key) => {
                tracing::debug!("Photo object not found: {key}");
                Self::new(
                    StatusCode::NOT_FOUND,
                    "photo_not_found",
                    "Photo not found",
                    false,
                )
            }
            UpstreamError(msg) => {
                tracing::error!("S3 upstream error: {msg}");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "upstream_error",
                    "S3 service temporarily unavailable",
                    true,
                )
            }
            S3Error(msg) | AwsError(msg) => {
                tracing::error!("S3/AWS error: {msg}");
                Self::internal()
            }
        }
    }
}

/// Convert JWT errors to application errors
impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::ValidationError => Self::new(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid or expired token",
                false,
            ),
            JwtError::EncodingError(_) => {
                tracing::error!("JWT encoding error: {err}");
                Self::internal()
            }
        }
    }
}

/// Convert password hashing errors to application errors
impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        tracing::error!("Password hashing error: {err}");
        Self::internal()
    }
}

impl OperationOutput for AppError {
    type Inner = ApiErrorResponse;

    fn operation_response(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Option<aide::openapi::Response> {
        Json::<ApiErrorResponse>::operation_response(ctx, operation)
    }
}
