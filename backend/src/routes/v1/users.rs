use std::sync::Arc;

use axum::{http::StatusCode, Extension, Json};
use axum_valid::Valid;
use catalog_storage::user_account::{UserAccount, UserAccountCreateRequest, UserAccountStorage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::{middleware::AuthenticatedUser, password, types::AppError};

/// Request to register a new account
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    /// Email address, used as the account identity
    #[validate(email, length(max = 255))]
    pub email: String,

    /// Plaintext password, 8 to 128 characters
    #[validate(length(min = 8, max = 128))]
    pub password: String,

    /// Display name shown on the profile
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Request to update the caller's profile
///
/// Email is the identity key and cannot be changed; the password has its
/// own endpoint.
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Request to change the caller's password
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct ChangePasswordRequest {
    /// Current password, verified before any change is made
    #[validate(length(min = 1))]
    pub old_password: String,

    /// Replacement password, same policy as registration
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

/// Profile data returned for an account
///
/// The password hash is never part of any response.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UserResponse {
    /// Email address of the account
    pub email: String,
    /// Display name
    pub name: String,
    /// Timestamp of account creation
    pub created_at: i64,
    /// Timestamp of the last profile or password change
    pub updated_at: i64,
}

impl From<UserAccount> for UserResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            email: account.email,
            name: account.name,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Lowercases an email so differently-cased spellings land on one account
pub(super) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Register a new user account
///
/// Hashes the password with Argon2id and stores the account under its
/// lowercased email. Registration is conditional on the email being unused.
///
/// # Returns
///
/// Returns `201 CREATED` with the new profile on success
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Invalid input, or the email is already registered
/// - `500 INTERNAL_SERVER_ERROR` - Password hashing fails
/// - `503 SERVICE_UNAVAILABLE` - Database connectivity issues
#[instrument(skip_all)]
pub async fn register(
    Extension(user_account_storage): Extension<Arc<UserAccountStorage>>,
    Valid(Json(payload)): Valid<Json<RegisterRequest>>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let password_hash = password::hash_password(payload.password).await?;

    let account = user_account_storage
        .create(UserAccountCreateRequest {
            email: normalize_email(&payload.email),
            password_hash,
            name: payload.name,
        })
        .await?;

    tracing::info!(email = %account.email, "Registered new account");

    Ok((StatusCode::CREATED, Json(account.into())))
}

/// Get the authenticated user's profile
///
/// # Errors
///
/// Returns an error if:
/// - `401 UNAUTHORIZED` - Invalid or missing authentication
/// - `404 NOT_FOUND` - The account no longer exists
/// - `503 SERVICE_UNAVAILABLE` - Database connectivity issues
#[instrument(skip_all)]
pub async fn get_profile(
    user: AuthenticatedUser,
    Extension(user_account_storage): Extension<Arc<UserAccountStorage>>,
) -> Result<Json<UserResponse>, AppError> {
    let account = load_account(&user_account_storage, &user.email).await?;
    Ok(Json(account.into()))
}

/// Update the authenticated user's profile
///
/// Only the display name is mutable; email is the identity key.
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Invalid input
/// - `401 UNAUTHORIZED` - Invalid or missing authentication
/// - `404 NOT_FOUND` - The account no longer exists
/// - `503 SERVICE_UNAVAILABLE` - Database connectivity issues
#[instrument(skip_all)]
pub async fn update_profile(
    user: AuthenticatedUser,
    Extension(user_account_storage): Extension<Arc<UserAccountStorage>>,
    Valid(Json(payload)): Valid<Json<UpdateProfileRequest>>,
) -> Result<Json<UserResponse>, AppError> {
    let account = load_account(&user_account_storage, &user.email).await?;

    user_account_storage
        .update_name(&account.email, &payload.name)
        .await?;

    let updated = load_account(&user_account_storage, &user.email).await?;
    Ok(Json(updated.into()))
}

/// Change the authenticated user's password
///
/// The current password must verify against the stored hash before the
/// new one is accepted.
///
/// # Returns
///
/// Returns `204 NO_CONTENT` on success
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - New password fails the policy
/// - `401 UNAUTHORIZED` - Current password does not match
/// - `404 NOT_FOUND` - The account no longer exists
/// - `503 SERVICE_UNAVAILABLE` - Database connectivity issues
#[instrument(skip_all)]
pub async fn change_password(
    user: AuthenticatedUser,
    Extension(user_account_storage): Extension<Arc<UserAccountStorage>>,
    Valid(Json(payload)): Valid<Json<ChangePasswordRequest>>,
) -> Result<StatusCode, AppError> {
    let account = load_account(&user_account_storage, &user.email).await?;

    let old_matches =
        password::verify_password(payload.old_password, account.password_hash.clone()).await?;
    if !old_matches {
        return Err(AppError::new(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "Current password does not match",
            false,
        ));
    }

    let new_hash = password::hash_password(payload.new_password).await?;
    user_account_storage
        .update_password_hash(&account.email, &new_hash)
        .await?;

    tracing::info!(email = %account.email, "Password changed");

    Ok(StatusCode::NO_CONTENT)
}

/// Fetches an account or maps its absence to a 404
async fn load_account(
    user_account_storage: &UserAccountStorage,
    email: &str,
) -> Result<UserAccount, AppError> {
    user_account_storage
        .get_by_email(email)
        .await?
        .ok_or_else(|| {
            AppError::new(
                StatusCode::NOT_FOUND,
                "user_not_found",
                "User account not found",
                false,
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases_and_trims() {
        assert_eq!(normalize_email("User@Example.COM"), "user@example.com");
        assert_eq!(normalize_email("  user@example.com "), "user@example.com");
        assert_eq!(normalize_email("user@example.com"), "user@example.com");
    }
}
