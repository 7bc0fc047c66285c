use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, GlobalSecondaryIndex, KeySchemaElement, KeyType, Projection,
    ProjectionType, ScalarAttributeType,
};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const TEST_OWNER_INDEX_NAME: &str = "owner-index";

/// Helper for creating and managing DynamoDB tables in tests
///
/// Creates every table used in backend server.
pub struct DynamoDbTestSetup {
    client: Arc<DynamoDbClient>,
    pub users_table_name: String,
    pub perfumes_table_name: String,
}

impl DynamoDbTestSetup {
    pub async fn new(client: Arc<DynamoDbClient>) -> Self {
        let users_table_name = Self::create_users_table(&client).await;
        let perfumes_table_name = Self::create_perfumes_table(&client).await;

        Self {
            client,
            users_table_name,
            perfumes_table_name,
        }
    }

    /// Creates a test users table with a unique name
    async fn create_users_table(client: &DynamoDbClient) -> String {
        let table_name = format!("test-catalog-users-{}", Uuid::new_v4());

        client
            .create_table()
            .table_name(&table_name)
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name("email")
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .unwrap(),
            )
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name("email")
                    .key_type(KeyType::Hash)
                    .build()
                    .unwrap(),
            )
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .expect("Failed to create test users table");

        // Wait for table to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        table_name
    }

    /// Creates a test perfumes table with the owner GSI
    async fn create_perfumes_table(client: &DynamoDbClient) -> String {
        let table_name = format!("test-catalog-perfumes-{}", Uuid::new_v4());

        client
            .create_table()
            .table_name(&table_name)
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name("id")
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .unwrap(),
            )
            .attribute_definitions(
                AttributeDefinition::builder()
                    .attribute_name("owner_email")
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .unwrap(),
            )
            .key_schema(
                KeySchemaElement::builder()
                    .attribute_name("id")
                    .key_type(KeyType::Hash)
                    .build()
                    .unwrap(),
            )
            .global_secondary_indexes(
                GlobalSecondaryIndex::builder()
                    .index_name(TEST_OWNER_INDEX_NAME)
                    .key_schema(
                        KeySchemaElement::builder()
                            .attribute_name("owner_email")
                            .key_type(KeyType::Hash)
                            .build()
                            .unwrap(),
                    )
                    .projection(
                        Projection::builder()
                            .projection_type(ProjectionType::All)
                            .build(),
                    )
                    .build()
                    .unwrap(),
            )
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .expect("Failed to create test perfumes table");

        // Wait for table to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        table_name
    }
}

impl Drop for DynamoDbTestSetup {
    fn drop(&mut self) {
        // Clean up all tables
        let client = self.client.clone();
        let users_table_name = self.users_table_name.clone();
        let perfumes_table_name = self.perfumes_table_name.clone();

        // Use tokio runtime to delete tables
        let handle = tokio::runtime::Handle::try_current();
        if let Ok(handle) = handle {
            handle.spawn(async move {
                let _ = client
                    .delete_table()
                    .table_name(&users_table_name)
                    .send()
                    .await;
                let _ = client
                    .delete_table()
                    .table_name(&perfumes_table_name)
                    .send()
                    .await;
            });
        }
    }
}
