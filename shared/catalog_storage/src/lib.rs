//! Storage services for the perfume catalog backend
//!
//! This crate wraps the `DynamoDB` tables backing the API: user accounts
//! keyed by email, and perfume records keyed by id with an owner index.

pub mod perfume;
pub mod user_account;
