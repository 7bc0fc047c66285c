//! User account storage module for `DynamoDB` operations
//!
//! Accounts are keyed by email, which doubles as the user's identity
//! throughout the API. The password hash stored here is an Argon2id PHC
//! string produced by the backend; this crate never sees plaintext.

mod error;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
pub use error::{UserAccountStorageError, UserAccountStorageResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_dynamo::to_item;
use std::sync::Arc;
use strum::Display;

/// `DynamoDB` table for user accounts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    /// Primary key - unique email address of the account
    pub email: String,
    /// Argon2id PHC-format password hash
    pub password_hash: String,
    /// Display name shown on the profile
    pub name: String,
    /// Timestamp of account creation
    pub created_at: i64,
    /// Timestamp of the last profile or password change
    pub updated_at: i64,
}

/// Request to create a new user account
#[derive(Debug, Clone)]
pub struct UserAccountCreateRequest {
    /// Unique email address of the account
    pub email: String,
    /// Argon2id PHC-format password hash
    pub password_hash: String,
    /// Display name shown on the profile
    pub name: String,
}

/// `DynamoDB` attribute names for the user account table
#[derive(Debug, Display)]
#[strum(serialize_all = "snake_case")]
pub enum UserAccountAttribute {
    /// Primary key - email address
    Email,
    /// Argon2id password hash
    PasswordHash,
    /// Display name
    Name,
    /// Creation timestamp
    CreatedAt,
    /// Last update timestamp
    UpdatedAt,
}

/// Storage client for user account operations
pub struct UserAccountStorage {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
}

impl UserAccountStorage {
    /// Creates a new storage instance
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured `DynamoDB` client
    /// * `table_name` - `DynamoDB` table name for user accounts
    #[must_use]
    pub const fn new(dynamodb_client: Arc<DynamoDbClient>, table_name: String) -> Self {
        Self {
            dynamodb_client,
            table_name,
        }
    }

    /// Create a new user account
    ///
    /// The put is conditional on the email not existing yet, so a second
    /// registration with the same email fails with `EmailTaken`.
    ///
    /// # Errors
    ///
    /// Returns `UserAccountStorageError::EmailTaken` if the email is already
    /// registered, or a `DynamoDB` error if the put operation fails
    pub async fn create(
        &self,
        request: UserAccountCreateRequest,
    ) -> UserAccountStorageResult<UserAccount> {
        let now = Utc::now().timestamp();
        let account = UserAccount {
            email: request.email,
            password_hash: request.password_hash,
            name: request.name,
            created_at: now,
            updated_at: now,
        };

        let item = to_item(&account)?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#pk)")
            .expression_attribute_names("#pk", UserAccountAttribute::Email.to_string())
            .send()
            .await
            .map_err(|err| {
                if matches!(
                    err,
                    SdkError::ServiceError(ref svc) if svc.err().is_conditional_check_failed_exception()
                ) {
                    UserAccountStorageError::EmailTaken
                } else {
                    err.into()
                }
            })?;

        Ok(account)
    }

    /// Get a user account by email
    ///
    /// # Errors
    ///
    /// Returns `UserAccountStorageError` if the `DynamoDB` get operation fails
    pub async fn get_by_email(&self, email: &str) -> UserAccountStorageResult<Option<UserAccount>> {
        let response = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key(
                UserAccountAttribute::Email.to_string(),
                AttributeValue::S(email.to_string()),
            )
            .send()
            .await?;

        response
            .item()
            .map(|item| {
                serde_dynamo::from_item(item.clone())
                    .map_err(|e| UserAccountStorageError::SerializationError(e.to_string()))
            })
            .transpose()
    }

    /// Update the display name for a given email
    ///
    /// # Errors
    ///
    /// Returns `UserAccountStorageError` if the `DynamoDB` update operation fails
    pub async fn update_name(&self, email: &str, name: &str) -> UserAccountStorageResult<()> {
        self.dynamodb_client
            .update_item()
            .table_name(&self.table_name)
            .key(
                UserAccountAttribute::Email.to_string(),
                AttributeValue::S(email.to_string()),
            )
            .update_expression("SET #name = :name, #updated_at = :updated_at")
            .expression_attribute_names("#name", UserAccountAttribute::Name.to_string())
            .expression_attribute_values(":name", AttributeValue::S(name.to_string()))
            .expression_attribute_names("#updated_at", UserAccountAttribute::UpdatedAt.to_string())
            .expression_attribute_values(
                ":updated_at",
                AttributeValue::N(Utc::now().timestamp().to_string()),
            )
            .send()
            .await?;

        Ok(())
    }

    /// Update the password hash for a given email
    ///
    /// # Errors
    ///
    /// Returns `UserAccountStorageError` if the `DynamoDB` update operation fails
    pub async fn update_password_hash(
        &self,
        email: &str,
        password_hash: &str,
    ) -> UserAccountStorageResult<()> {
        self.dynamodb_client
            .update_item()
            .table_name(&self.table_name)
            .key(
                UserAccountAttribute::Email.to_string(),
                AttributeValue::S(email.to_string()),
            )
            .update_expression("SET #password_hash = :password_hash, #updated_at = :updated_at")
            .expression_attribute_names(
                "#password_hash",
                UserAccountAttribute::PasswordHash.to_string(),
            )
            .expression_attribute_values(
                ":password_hash",
                AttributeValue::S(password_hash.to_string()),
            )
            .expression_attribute_names("#updated_at", UserAccountAttribute::UpdatedAt.to_string())
            .expression_attribute_values(
                ":updated_at",
                AttributeValue::N(Utc::now().timestamp().to_string()),
            )
            .send()
            .await?;

        Ok(())
    }
}
