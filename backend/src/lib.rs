//! Perfume Catalog Backend service

#![deny(clippy::all, clippy::pedantic, clippy::nursery, missing_docs)]

/// JWT token management
pub mod jwt;

/// Request middleware
pub mod middleware;

/// Password hashing and verification
pub mod password;

/// S3-based photo storage
pub mod photo_storage;

/// Route handlers
pub mod routes;

/// Server startup
pub mod server;

/// Shared types: environment, errors
pub mod types;
