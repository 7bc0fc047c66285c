//! Perfume storage module for `DynamoDB` operations
//!
//! Perfumes are keyed by a generated UUID and carry their owner's email.
//! An `owner-index` GSI serves the per-user list view; attribute filtering
//! and sorting happen in the backend on the query result.

mod error;

use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoDbClient;
pub use error::{PerfumeStorageError, PerfumeStorageResult};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_dynamo::{from_items, to_item};
use std::sync::Arc;
use strum::Display;

/// `DynamoDB` table for perfume records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Perfume {
    /// Primary key - unique perfume ID (UUID v4)
    pub id: String,
    /// Email of the owning user (GSI hash key)
    pub owner_email: String,
    /// Display name of the fragrance
    pub name: String,
    /// Brand/creator attribute, used as a filter key
    pub designer: String,
    /// Unordered set of scent notes
    pub notes: Vec<String>,
    /// Optional free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional community rating, 0.0 to 10.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Number of votes behind the rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_votes: Option<u32>,
    /// Numeric gender category from the source data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<i32>,
    /// Longevity score, 0.0 to 10.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longevity: Option<f64>,
    /// Sillage score, 0.0 to 10.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sillage: Option<f64>,
    /// Price/value score, 0.0 to 10.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_value: Option<f64>,
    /// S3 object key of the photo, if one has been uploaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_key: Option<String>,
    /// Timestamp of record creation
    pub created_at: i64,
    /// Timestamp of the last update
    pub updated_at: i64,
}

/// Request to create a new perfume record
#[derive(Debug, Clone)]
pub struct PerfumeCreateRequest {
    /// Email of the owning user
    pub owner_email: String,
    /// Display name of the fragrance
    pub name: String,
    /// Brand/creator attribute
    pub designer: String,
    /// Unordered set of scent notes
    pub notes: Vec<String>,
    /// Optional free-text description
    pub description: Option<String>,
    /// Optional community rating
    pub rating: Option<f64>,
    /// Number of votes behind the rating
    pub number_of_votes: Option<u32>,
    /// Numeric gender category
    pub gender: Option<i32>,
    /// Longevity score
    pub longevity: Option<f64>,
    /// Sillage score
    pub sillage: Option<f64>,
    /// Price/value score
    pub price_value: Option<f64>,
}

/// Mutable attributes of an existing perfume record
#[derive(Debug, Clone)]
pub struct PerfumeUpdateRequest {
    /// Display name of the fragrance
    pub name: String,
    /// Brand/creator attribute
    pub designer: String,
    /// Unordered set of scent notes
    pub notes: Vec<String>,
    /// Optional free-text description
    pub description: Option<String>,
    /// Optional community rating
    pub rating: Option<f64>,
    /// Number of votes behind the rating
    pub number_of_votes: Option<u32>,
    /// Numeric gender category
    pub gender: Option<i32>,
    /// Longevity score
    pub longevity: Option<f64>,
    /// Sillage score
    pub sillage: Option<f64>,
    /// Price/value score
    pub price_value: Option<f64>,
}

/// `DynamoDB` attribute names for the perfume table
#[derive(Debug, Display)]
#[strum(serialize_all = "snake_case")]
pub enum PerfumeAttribute {
    /// Primary key - unique perfume ID
    Id,
    /// Owner email (used for GSI)
    OwnerEmail,
    /// Display name
    Name,
    /// Designer attribute
    Designer,
    /// Scent notes
    Notes,
    /// Description text
    Description,
    /// Rating value
    Rating,
    /// Vote count
    NumberOfVotes,
    /// Gender category
    Gender,
    /// Longevity score
    Longevity,
    /// Sillage score
    Sillage,
    /// Price/value score
    PriceValue,
    /// Photo S3 key
    PhotoKey,
    /// Creation timestamp
    CreatedAt,
    /// Last update timestamp
    UpdatedAt,
}

/// Storage client for perfume operations
pub struct PerfumeStorage {
    dynamodb_client: Arc<DynamoDbClient>,
    table_name: String,
    owner_index_name: String,
}

impl PerfumeStorage {
    /// Creates a new storage instance
    ///
    /// # Arguments
    ///
    /// * `dynamodb_client` - Pre-configured `DynamoDB` client
    /// * `table_name` - `DynamoDB` table name for perfumes
    /// * `owner_index_name` - Name of the GSI for owner queries
    #[must_use]
    pub const fn new(
        dynamodb_client: Arc<DynamoDbClient>,
        table_name: String,
        owner_index_name: String,
    ) -> Self {
        Self {
            dynamodb_client,
            table_name,
            owner_index_name,
        }
    }

    /// Create a new perfume with a generated UUID
    ///
    /// # Errors
    ///
    /// Returns `PerfumeStorageError` if the `DynamoDB` put operation fails
    pub async fn create(&self, request: PerfumeCreateRequest) -> PerfumeStorageResult<Perfume> {
        let now = Utc::now().timestamp();
        let perfume = Perfume {
            id: uuid::Uuid::new_v4().to_string(),
            owner_email: request.owner_email,
            name: request.name,
            designer: request.designer,
            notes: request.notes,
            description: request.description,
            rating: request.rating,
            number_of_votes: request.number_of_votes,
            gender: request.gender,
            longevity: request.longevity,
            sillage: request.sillage,
            price_value: request.price_value,
            photo_key: None,
            created_at: now,
            updated_at: now,
        };

        let item = to_item(&perfume)?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(perfume)
    }

    /// Get a single perfume by ID
    ///
    /// # Errors
    ///
    /// Returns `PerfumeStorageError` if the `DynamoDB` get operation fails
    pub async fn get_one(&self, id: &str) -> PerfumeStorageResult<Option<Perfume>> {
        let response = self
            .dynamodb_client
            .get_item()
            .table_name(&self.table_name)
            .key(
                PerfumeAttribute::Id.to_string(),
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await?;

        response
            .item()
            .map(|item| {
                serde_dynamo::from_item(item.clone())
                    .map_err(|e| PerfumeStorageError::SerializationError(e.to_string()))
            })
            .transpose()
    }

    /// Get all perfumes owned by the given user
    ///
    /// # Errors
    ///
    /// Returns `PerfumeStorageError` if the `DynamoDB` query operation fails
    pub async fn list_by_owner(&self, owner_email: &str) -> PerfumeStorageResult<Vec<Perfume>> {
        let response = self
            .dynamodb_client
            .query()
            .table_name(&self.table_name)
            .index_name(&self.owner_index_name)
            .key_condition_expression("#owner_email = :owner_email")
            .expression_attribute_names("#owner_email", PerfumeAttribute::OwnerEmail.to_string())
            .expression_attribute_values(
                ":owner_email",
                AttributeValue::S(owner_email.to_string()),
            )
            .send()
            .await?;

        let items = response.items.unwrap_or_default();
        Ok(from_items(items)?)
    }

    /// Update the mutable attributes of an existing perfume
    ///
    /// Ownership, photo key and creation timestamp are left untouched.
    /// Returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns `PerfumeStorageError` if the `DynamoDB` put operation fails
    pub async fn update(
        &self,
        existing: Perfume,
        request: PerfumeUpdateRequest,
    ) -> PerfumeStorageResult<Perfume> {
        let perfume = Perfume {
            name: request.name,
            designer: request.designer,
            notes: request.notes,
            description: request.description,
            rating: request.rating,
            number_of_votes: request.number_of_votes,
            gender: request.gender,
            longevity: request.longevity,
            sillage: request.sillage,
            price_value: request.price_value,
            updated_at: Utc::now().timestamp(),
            ..existing
        };

        let item = to_item(&perfume)?;

        self.dynamodb_client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .send()
            .await?;

        Ok(perfume)
    }

    /// Set the photo key of a perfume
    ///
    /// # Errors
    ///
    /// Returns `PerfumeStorageError` if the `DynamoDB` update operation fails
    pub async fn set_photo_key(&self, id: &str, photo_key: &str) -> PerfumeStorageResult<()> {
        self.dynamodb_client
            .update_item()
            .table_name(&self.table_name)
            .key(
                PerfumeAttribute::Id.to_string(),
                AttributeValue::S(id.to_string()),
            )
            .update_expression("SET #photo_key = :photo_key, #updated_at = :updated_at")
            .expression_attribute_names("#photo_key", PerfumeAttribute::PhotoKey.to_string())
            .expression_attribute_values(":photo_key", AttributeValue::S(photo_key.to_string()))
            .expression_attribute_names("#updated_at", PerfumeAttribute::UpdatedAt.to_string())
            .expression_attribute_values(
                ":updated_at",
                AttributeValue::N(Utc::now().timestamp().to_string()),
            )
            .send()
            .await?;

        Ok(())
    }

    /// Clear the photo key of a perfume
    ///
    /// # Errors
    ///
    /// Returns `PerfumeStorageError` if the `DynamoDB` update operation fails
    pub async fn clear_photo_key(&self, id: &str) -> PerfumeStorageResult<()> {
        self.dynamodb_client
            .update_item()
            .table_name(&self.table_name)
            .key(
                PerfumeAttribute::Id.to_string(),
                AttributeValue::S(id.to_string()),
            )
            .update_expression("REMOVE #photo_key SET #updated_at = :updated_at")
            .expression_attribute_names("#photo_key", PerfumeAttribute::PhotoKey.to_string())
            .expression_attribute_names("#updated_at", PerfumeAttribute::UpdatedAt.to_string())
            .expression_attribute_values(
                ":updated_at",
                AttributeValue::N(Utc::now().timestamp().to_string()),
            )
            .send()
            .await?;

        Ok(())
    }

    /// Delete a perfume by ID
    ///
    /// The caller is responsible for removing the photo object first to keep
    /// the photo lifecycle tied to the record.
    ///
    /// # Errors
    ///
    /// Returns `PerfumeStorageError` if the `DynamoDB` delete operation fails
    pub async fn delete(&self, id: &str) -> PerfumeStorageResult<()> {
        self.dynamodb_client
            .delete_item()
            .table_name(&self.table_name)
            .key(
                PerfumeAttribute::Id.to_string(),
                AttributeValue::S(id.to_string()),
            )
            .send()
            .await?;

        Ok(())
    }
}
