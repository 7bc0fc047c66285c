use aws_sdk_s3::{error::SdkError, operation::head_object::HeadObjectError, Client as S3Client};
use std::sync::Arc;
use uuid::Uuid;

/// Helper for creating and cleaning up a test photo bucket
pub struct S3TestSetup {
    client: Arc<S3Client>,
    pub bucket_name: String,
}

impl S3TestSetup {
    pub async fn new(client: Arc<S3Client>) -> Self {
        let bucket_name = format!("test-perfume-photos-{}", Uuid::new_v4());

        client
            .create_bucket()
            .bucket(&bucket_name)
            .send()
            .await
            .expect("Failed to create test bucket");

        Self {
            client,
            bucket_name,
        }
    }

    /// Removes every object, then the bucket itself
    pub async fn cleanup(&self) {
        if let Ok(listing) = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket_name)
            .send()
            .await
        {
            for object in listing.contents() {
                if let Some(key) = object.key() {
                    let _ = self
                        .client
                        .delete_object()
                        .bucket(&self.bucket_name)
                        .key(key)
                        .send()
                        .await;
                }
            }
        }

        let _ = self
            .client
            .delete_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await;
    }
}

/// Check if S3 object exists
pub async fn s3_object_exists(
    s3_client: &S3Client,
    bucket: &str,
    key: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    match s3_client.head_object().bucket(bucket).key(key).send().await {
        Ok(_) => Ok(true),
        Err(SdkError::ServiceError(service_err))
            if matches!(service_err.err(), HeadObjectError::NotFound(_)) =>
        {
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
