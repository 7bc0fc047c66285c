//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};

/// Application environment configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the `DynamoDB` table name for user accounts
    ///
    /// # Panics
    ///
    /// Panics if `USERS_TABLE_NAME` is not set outside of development
    #[must_use]
    pub fn users_table_name(&self) -> String {
        match self {
            Self::Production | Self::Staging => env::var("USERS_TABLE_NAME")
                .expect("USERS_TABLE_NAME environment variable is not set"),
            Self::Development => {
                env::var("USERS_TABLE_NAME").unwrap_or_else(|_| "catalog-users".to_string())
            }
        }
    }

    /// Returns the `DynamoDB` table name for perfumes
    ///
    /// # Panics
    ///
    /// Panics if `PERFUMES_TABLE_NAME` is not set outside of development
    #[must_use]
    pub fn perfumes_table_name(&self) -> String {
        match self {
            Self::Production | Self::Staging => env::var("PERFUMES_TABLE_NAME")
                .expect("PERFUMES_TABLE_NAME environment variable is not set"),
            Self::Development => {
                env::var("PERFUMES_TABLE_NAME").unwrap_or_else(|_| "catalog-perfumes".to_string())
            }
        }
    }

    /// Returns the GSI name for perfume owner queries
    #[must_use]
    pub fn perfume_owner_index_name(&self) -> String {
        env::var("PERFUME_OWNER_INDEX_NAME").unwrap_or_else(|_| "owner-index".to_string())
    }

    /// Returns the S3 bucket name for perfume photos
    ///
    /// # Panics
    ///
    /// Panics if `PHOTOS_BUCKET_NAME` is not set outside of development
    #[must_use]
    pub fn photos_bucket(&self) -> String {
        match self {
            Self::Production | Self::Staging => env::var("PHOTOS_BUCKET_NAME")
                .expect("PHOTOS_BUCKET_NAME environment variable is not set"),
            Self::Development => {
                env::var("PHOTOS_BUCKET_NAME").unwrap_or_else(|_| "perfume-photos".to_string())
            }
        }
    }

    /// Returns the HMAC secret used to sign and validate JWTs
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set outside of development
    #[must_use]
    pub fn jwt_secret(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("JWT_SECRET").expect("JWT_SECRET environment variable is not set")
            }
            Self::Development => {
                env::var("JWT_SECRET").unwrap_or_else(|_| "dev-only-jwt-secret".to_string())
            }
        }
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }
}
