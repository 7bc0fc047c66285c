use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use axum_valid::Valid;
use catalog_storage::user_account::UserAccountStorage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::{
    jwt::{Claims, JwtManager},
    password,
    types::AppError,
};

/// Request to exchange credentials for an access token
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    /// Email address of the account
    #[validate(email, length(max = 255))]
    pub email: String,

    /// Plaintext password
    #[validate(length(min = 1))]
    pub password: String,
}

/// Issued access token
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AuthResponse {
    /// JWT access token
    pub access_token: String,
    /// Expires at Unix timestamp in seconds
    pub expires_at: i64,
}

/// Authenticates a user with email and password and issues a JWT token
///
/// An unknown email and a wrong password both produce the same 401 so a
/// caller cannot tell which emails are registered.
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Invalid request parameters
/// - `401 UNAUTHORIZED` - Email or password does not match
/// - `500 INTERNAL_SERVER_ERROR` - Token generation failed
/// - `503 SERVICE_UNAVAILABLE` - Database connectivity issues
#[instrument(skip_all)]
pub async fn login(
    Extension(jwt_manager): Extension<Arc<JwtManager>>,
    Extension(user_account_storage): Extension<Arc<UserAccountStorage>>,
    Valid(Json(payload)): Valid<Json<LoginRequest>>,
) -> Result<Json<AuthResponse>, AppError> {
    const INVALID_CREDENTIALS: AppError = AppError::new(
        StatusCode::UNAUTHORIZED,
        "invalid_credentials",
        "Unable to authenticate with provided credentials",
        false,
    );

    let email = super::users::normalize_email(&payload.email);
    let Some(account) = user_account_storage.get_by_email(&email).await? else {
        return Err(INVALID_CREDENTIALS);
    };

    let matches =
        password::verify_password(payload.password, account.password_hash.clone()).await?;
    if !matches {
        return Err(INVALID_CREDENTIALS);
    }

    let claims = Claims::for_email(account.email);
    let access_token = jwt_manager.issue_token(&claims)?;

    Ok(Json(AuthResponse {
        access_token,
        expires_at: claims.exp,
    }))
}
