use aide::openapi::OpenApi;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_s3::Client as S3Client;
use axum::{body::Body, http::Request, response::Response, Extension, Router};
use catalog_storage::{perfume::PerfumeStorage, user_account::UserAccountStorage};
use perfume_backend::{
    jwt::JwtManager, photo_storage::PhotoStorage, routes, types::Environment,
};
use std::sync::Arc;
use tower::ServiceExt;

use super::dynamodb_setup::{DynamoDbTestSetup, TEST_OWNER_INDEX_NAME};
use super::s3_utils::S3TestSetup;

pub const TEST_JWT_SECRET: &[u8] = b"test-only-jwt-secret";

/// Setup test environment variables with all the required configuration
pub fn setup_test_env() {
    // Load test environment variables
    dotenvy::from_path(".env.example").ok();

    // Initialize tracing for tests
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Base test setup with core dependencies
#[allow(dead_code)]
pub struct TestSetup {
    pub router: Router,
    pub environment: Environment,
    pub s3_client: Arc<S3Client>,
    pub bucket_name: String,
    pub photo_storage: Arc<PhotoStorage>,
    pub perfume_storage: Arc<PerfumeStorage>,
    pub user_account_storage: Arc<UserAccountStorage>,
    pub jwt_manager: Arc<JwtManager>,
    // Keep the table/bucket setups alive for the duration of the test
    _dynamodb_setup: DynamoDbTestSetup,
    s3_setup: S3TestSetup,
}

impl TestSetup {
    pub async fn new() -> Self {
        setup_test_env();

        let environment = Environment::Development;

        let s3_config = environment.s3_client_config().await;
        let s3_client = Arc::new(S3Client::from_conf(s3_config));
        let s3_setup = S3TestSetup::new(s3_client.clone()).await;
        let bucket_name = s3_setup.bucket_name.clone();

        let photo_storage = Arc::new(PhotoStorage::new(s3_client.clone(), bucket_name.clone()));

        let dynamodb_client = Arc::new(DynamoDbClient::new(&environment.aws_config().await));
        let dynamodb_setup = DynamoDbTestSetup::new(dynamodb_client.clone()).await;

        let user_account_storage = Arc::new(UserAccountStorage::new(
            dynamodb_client.clone(),
            dynamodb_setup.users_table_name.clone(),
        ));
        let perfume_storage = Arc::new(PerfumeStorage::new(
            dynamodb_client.clone(),
            dynamodb_setup.perfumes_table_name.clone(),
            TEST_OWNER_INDEX_NAME.to_string(),
        ));

        let jwt_manager = Arc::new(JwtManager::from_secret(TEST_JWT_SECRET));

        let mut openapi = OpenApi::default();
        let router = routes::handler()
            .finish_api(&mut openapi)
            .layer(Extension(openapi))
            .layer(Extension(environment))
            .layer(Extension(user_account_storage.clone()))
            .layer(Extension(perfume_storage.clone()))
            .layer(Extension(photo_storage.clone()))
            .layer(Extension(jwt_manager.clone()));

        Self {
            router,
            environment,
            s3_client,
            bucket_name,
            photo_storage,
            perfume_storage,
            user_account_storage,
            jwt_manager,
            _dynamodb_setup: dynamodb_setup,
            s3_setup,
        }
    }

    pub async fn cleanup(&self) {
        self.s3_setup.cleanup().await;
    }

    pub async fn send_json_request(
        &self,
        method: &str,
        route: &str,
        payload: serde_json::Value,
        token: Option<&str>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut builder = Request::builder()
            .uri(route)
            .method(method)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = builder.body(Body::from(payload.to_string()))?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
        token: Option<&str>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_json_request("POST", route, payload, token).await
    }

    pub async fn send_put_request(
        &self,
        route: &str,
        payload: serde_json::Value,
        token: Option<&str>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_json_request("PUT", route, payload, token).await
    }

    pub async fn send_patch_request(
        &self,
        route: &str,
        payload: serde_json::Value,
        token: Option<&str>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_json_request("PATCH", route, payload, token).await
    }

    pub async fn send_get_request(
        &self,
        route: &str,
        token: Option<&str>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut builder = Request::builder().uri(route).method("GET");

        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = builder.body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_delete_request(
        &self,
        route: &str,
        token: Option<&str>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut builder = Request::builder().uri(route).method("DELETE");

        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = builder.body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    /// Sends a raw-bytes PUT, used for photo uploads
    pub async fn send_put_bytes_request(
        &self,
        route: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
        token: Option<&str>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut builder = Request::builder().uri(route).method("PUT");

        if let Some(content_type) = content_type {
            builder = builder.header("Content-Type", content_type);
        }
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = builder.body(Body::from(bytes))?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn parse_response_body(
        &self,
        response: Response,
    ) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
        use http_body_util::BodyExt;

        let body = response.into_body().collect().await?.to_bytes();
        let json = serde_json::from_slice(&body)?;
        Ok(json)
    }
}
