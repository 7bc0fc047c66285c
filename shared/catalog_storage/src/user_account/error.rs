//! Error types for user account storage operations

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::{
    delete_item::DeleteItemError, get_item::GetItemError, put_item::PutItemError,
    update_item::UpdateItemError,
};
use thiserror::Error;

/// Result type alias for user account storage operations
pub type UserAccountStorageResult<T> = Result<T, UserAccountStorageError>;

/// Storage error types for user account operations
#[derive(Debug, Error)]
pub enum UserAccountStorageError {
    /// An account with this email already exists
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Failed to insert user account into `DynamoDB`
    #[error("Failed to insert user account into DynamoDB: {0:?}")]
    DynamoDbPutError(#[from] SdkError<PutItemError>),

    /// Failed to get user account from `DynamoDB`
    #[error("Failed to get user account from DynamoDB: {0:?}")]
    DynamoDbGetError(#[from] SdkError<GetItemError>),

    /// Failed to update user account in `DynamoDB`
    #[error("Failed to update user account in DynamoDB: {0:?}")]
    DynamoDbUpdateError(#[from] SdkError<UpdateItemError>),

    /// Failed to delete user account from `DynamoDB`
    #[error("Failed to delete user account from DynamoDB: {0:?}")]
    DynamoDbDeleteError(#[from] SdkError<DeleteItemError>),

    /// Failed to parse user account from `DynamoDB` item
    #[error("Failed to parse user account: {0}")]
    SerializationError(String),
}

impl From<serde_dynamo::Error> for UserAccountStorageError {
    fn from(err: serde_dynamo::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
