//! JWT token management using HMAC-SHA256 (HS256)
//!
//! Access tokens are compact JWTs signed with a shared secret taken from the
//! environment. Claims are `{ sub, iat, exp }` where `sub` is the account
//! email and `exp` is seven days from issuance.

mod error;

pub use error::JwtError;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::types::Environment;

/// Token expiration time in seconds (7 days)
pub const TOKEN_EXPIRATION_SECS: i64 = 7 * 24 * 60 * 60;

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the account email
    pub sub: String,
    /// Issued at, Unix seconds
    pub iat: i64,
    /// Expires at, Unix seconds
    pub exp: i64,
}

impl Claims {
    /// Builds claims for the given account email, expiring in
    /// [`TOKEN_EXPIRATION_SECS`]
    #[must_use]
    pub fn for_email(email: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: email,
            iat: now,
            exp: now + TOKEN_EXPIRATION_SECS,
        }
    }
}

/// JWT manager holding the signing and validation keys
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// Creates a new JWT manager from the environment's secret
    #[must_use]
    pub fn new(environment: &Environment) -> Self {
        let secret = environment.jwt_secret();
        Self::from_secret(secret.as_bytes())
    }

    /// Creates a new JWT manager from raw secret bytes
    #[must_use]
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issues a compact JWT for the given claims
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if signing fails
    pub fn issue_token(&self, claims: &Claims) -> Result<String, JwtError> {
        Ok(encode(
            &Header::new(Algorithm::HS256),
            claims,
            &self.encoding_key,
        )?)
    }

    /// Validates a token's signature and expiry and returns its claims
    ///
    /// # Errors
    ///
    /// Returns `JwtError::ValidationError` if the token is malformed,
    /// the signature does not match, or the token has expired
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| JwtError::ValidationError)
    }
}
