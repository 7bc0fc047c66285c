//! Error types for perfume storage operations

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::{
    delete_item::DeleteItemError, get_item::GetItemError, put_item::PutItemError,
    query::QueryError, update_item::UpdateItemError,
};
use thiserror::Error;

/// Result type alias for perfume storage operations
pub type PerfumeStorageResult<T> = Result<T, PerfumeStorageError>;

/// Storage error types for perfume operations
#[derive(Debug, Error)]
pub enum PerfumeStorageError {
    /// Failed to insert perfume into `DynamoDB`
    #[error("Failed to insert perfume into DynamoDB: {0:?}")]
    DynamoDbPutError(#[from] SdkError<PutItemError>),

    /// Failed to get perfume from `DynamoDB`
    #[error("Failed to get perfume from DynamoDB: {0:?}")]
    DynamoDbGetError(#[from] SdkError<GetItemError>),

    /// Failed to query perfumes from `DynamoDB`
    #[error("Failed to query perfumes from DynamoDB: {0:?}")]
    DynamoDbQueryError(#[from] SdkError<QueryError>),

    /// Failed to update perfume in `DynamoDB`
    #[error("Failed to update perfume in DynamoDB: {0:?}")]
    DynamoDbUpdateError(#[from] SdkError<UpdateItemError>),

    /// Failed to delete perfume from `DynamoDB`
    #[error("Failed to delete perfume from DynamoDB: {0:?}")]
    DynamoDbDeleteError(#[from] SdkError<DeleteItemError>),

    /// Failed to parse perfume from `DynamoDB` item
    #[error("Failed to parse perfume: {0}")]
    SerializationError(String),
}

impl From<serde_dynamo::Error> for PerfumeStorageError {
    fn from(err: serde_dynamo::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
