//! S3-based photo storage operations
//!
//! One photo object per perfume, keyed by the perfume's UUID with a
//! two-level prefix shard. The image content type is stored on the object
//! and returned verbatim on retrieval.

mod error;

use std::sync::Arc;

use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};

pub use error::{PhotoStorageError, PhotoStorageResult};

/// A photo fetched from the bucket
#[derive(Debug, Clone)]
pub struct StoredPhoto {
    /// Raw image bytes
    pub bytes: Vec<u8>,
    /// Content type recorded at upload time
    pub content_type: String,
}

/// Photo storage client for S3 operations
pub struct PhotoStorage {
    s3_client: Arc<S3Client>,
    bucket_name: String,
}

impl PhotoStorage {
    /// Creates a new photo storage client
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client
    /// * `bucket_name` - S3 bucket name for photo storage
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>, bucket_name: String) -> Self {
        Self {
            s3_client,
            bucket_name,
        }
    }

    /// Maps a perfume ID to its S3 object key
    ///
    /// Keys are sharded by the first characters of the UUID to spread
    /// objects across prefixes.
    #[must_use]
    pub fn photo_key(perfume_id: &str) -> String {
        let ad = perfume_id.get(0..2).unwrap_or(perfume_id);
        format!("photos/{ad}/{perfume_id}")
    }

    /// Uploads a photo, overwriting any previous object under the key
    ///
    /// # Errors
    ///
    /// Returns `PhotoStorageError` if the S3 put operation fails
    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> PhotoStorageResult<()> {
        self.s3_client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await?;

        Ok(())
    }

    /// Downloads a photo and its recorded content type
    ///
    /// # Errors
    ///
    /// Returns `PhotoStorageError::ObjectNotFound` if no object exists under
    /// the key, or another `PhotoStorageError` if the S3 get operation fails
    pub async fn download(&self, key: &str) -> PhotoStorageResult<StoredPhoto> {
        let response = self
            .s3_client
            .get_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await?;

        let content_type = response
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let bytes = response
            .body
            .collect()
            .await
            .map_err(|e| PhotoStorageError::S3Error(format!("Failed to read object body: {e}")))?
            .into_bytes()
            .to_vec();

        Ok(StoredPhoto {
            bytes,
            content_type,
        })
    }

    /// Deletes a photo object
    ///
    /// Deleting a missing key is not an error; S3 delete is idempotent.
    ///
    /// # Errors
    ///
    /// Returns `PhotoStorageError` if the S3 delete operation fails
    pub async fn delete(&self, key: &str) -> PhotoStorageResult<()> {
        self.s3_client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await?;

        Ok(())
    }
}
