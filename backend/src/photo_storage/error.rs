//! Error types for photo storage operations

use aws_sdk_s3::{
    error::SdkError,
    operation::{
        delete_object::DeleteObjectError, get_object::GetObjectError, put_object::PutObjectError,
    },
};
use thiserror::Error;

/// Result type for photo storage operations
pub type PhotoStorageResult<T> = Result<T, PhotoStorageError>;

/// Errors that can occur during photo storage operations
#[derive(Error, Debug)]
pub enum PhotoStorageError {
    /// S3 service error
    #[error("S3 service error: {0}")]
    S3Error(String),

    /// Object does not exist in the bucket
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// AWS SDK error
    #[error("AWS SDK error: {0}")]
    AwsError(String),

    /// Upstream service error (5xx from S3)
    #[error("Upstream service error: {0}")]
    UpstreamError(String),
}

impl From<SdkError<PutObjectError>> for PhotoStorageError {
    fn from(error: SdkError<PutObjectError>) -> Self {
        match error {
            SdkError::ServiceError(ref svc) if svc.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(format!("{error:?}"))
            }
            SdkError::ServiceError(_) => Self::S3Error(error.to_string()),
            _ => Self::AwsError(error.to_string()),
        }
    }
}

impl From<SdkError<DeleteObjectError>> for PhotoStorageError {
    fn from(error: SdkError<DeleteObjectError>) -> Self {
        match error {
            SdkError::ServiceError(ref svc) if svc.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(format!("{error:?}"))
            }
            SdkError::ServiceError(_) => Self::S3Error(error.to_string()),
            _ => Self::AwsError(error.to_string()),
        }
    }
}

impl From<SdkError<GetObjectError>> for PhotoStorageError {
    fn from(error: SdkError<GetObjectError>) -> Self {
        match error {
            SdkError::ServiceError(ref svc) if svc.err().is_no_such_key() => {
                Self::ObjectNotFound(error.to_string())
            }
            SdkError::ServiceError(ref svc) if svc.raw().status().as_u16() >= 500 => {
                Self::UpstreamError(format!("{error:?}"))
            }
            SdkError::ServiceError(_) => Self::S3Error(error.to_string()),
            _ => Self::AwsError(error.to_string()),
        }
    }
}
