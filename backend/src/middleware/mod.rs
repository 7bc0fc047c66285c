//! Request middleware

/// JWT authentication middleware
pub mod auth;

pub use auth::AuthenticatedUser;
