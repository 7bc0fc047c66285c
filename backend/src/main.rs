//! Perfume Catalog Backend entrypoint

use std::sync::Arc;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_s3::Client as S3Client;

use catalog_storage::{perfume::PerfumeStorage, user_account::UserAccountStorage};
use perfume_backend::{jwt::JwtManager, photo_storage::PhotoStorage, server, types::Environment};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // JSON log format for staging/production, regular format for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
        }
        Environment::Development => {
            fmt().with_env_filter(EnvFilter::from_default_env()).init();
        }
    }

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let photo_storage = Arc::new(PhotoStorage::new(s3_client, environment.photos_bucket()));

    let dynamodb_client = Arc::new(DynamoDbClient::new(&environment.aws_config().await));
    let user_account_storage = Arc::new(UserAccountStorage::new(
        dynamodb_client.clone(),
        environment.users_table_name(),
    ));
    let perfume_storage = Arc::new(PerfumeStorage::new(
        dynamodb_client,
        environment.perfumes_table_name(),
        environment.perfume_owner_index_name(),
    ));

    let jwt_manager = Arc::new(JwtManager::new(&environment));

    server::start(
        environment,
        user_account_storage,
        perfume_storage,
        photo_storage,
        jwt_manager,
    )
    .await
}
