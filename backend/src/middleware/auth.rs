use std::sync::Arc;

use aide::OperationIo;
use axum::{
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::Response,
    Extension,
};

use crate::{
    jwt::{Claims, JwtManager},
    types::AppError,
};

/// Authenticated user information extracted from the JWT
#[derive(Debug, Clone, OperationIo)]
pub struct AuthenticatedUser {
    /// The account email from the JWT subject
    pub email: String,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self { email: claims.sub }
    }
}

/// Axum extractor for authenticated user
///
/// Use this in handlers behind [`auth_middleware`] to get the caller's
/// identity:
/// ```ignore
/// async fn protected_handler(
///     user: AuthenticatedUser,
///     // ... other extractors
/// ) -> Result<impl IntoResponse, AppError> {
///     // Access user.email
///     Ok("Protected content")
/// }
/// ```
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            AppError::new(
                StatusCode::UNAUTHORIZED,
                "missing_auth",
                "Authentication required but user not found in request extensions",
                false,
            )
        })
    }
}

/// JWT Authentication middleware
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the JWT using [`JwtManager`]
/// 3. Adds [`AuthenticatedUser`] to request extensions
/// 4. Returns 401 for invalid/missing tokens
///
/// # Errors
///
/// - `AppError` - Invalid/missing token with 401 status code
pub async fn auth_middleware(
    Extension(jwt_manager): Extension<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::new(
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Authorization header must contain a valid Bearer token",
                false,
            )
        })?;

    let claims = jwt_manager.validate(token).map_err(|_| {
        AppError::new(
            StatusCode::UNAUTHORIZED,
            "invalid_token",
            "Invalid or expired token",
            false,
        )
    })?;

    let user = AuthenticatedUser::from(claims);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
