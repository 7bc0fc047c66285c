use std::cmp::Ordering;
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Extension, Json,
};
use axum_valid::Valid;
use catalog_storage::perfume::{
    Perfume, PerfumeCreateRequest, PerfumeStorage, PerfumeUpdateRequest,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::{
    middleware::AuthenticatedUser,
    photo_storage::PhotoStorage,
    types::AppError,
};

/// Mutable perfume attributes accepted on create and update
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct PerfumeAttributesRequest {
    /// Display name of the fragrance
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Brand/creator attribute, used as a filter key
    #[validate(length(min = 1, max = 255))]
    pub designer: String,

    /// Scent notes; duplicates are dropped
    #[validate(length(max = 50), custom(function = "validate_notes"))]
    #[serde(default)]
    pub notes: Vec<String>,

    /// Optional free-text description
    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// Optional rating, 0.0 to 10.0
    #[validate(range(min = 0.0, max = 10.0))]
    pub rating: Option<f64>,

    /// Number of votes behind the rating
    pub number_of_votes: Option<u32>,

    /// Numeric gender category from the source data
    pub gender: Option<i32>,

    /// Longevity score, 0.0 to 10.0
    #[validate(range(min = 0.0, max = 10.0))]
    pub longevity: Option<f64>,

    /// Sillage score, 0.0 to 10.0
    #[validate(range(min = 0.0, max = 10.0))]
    pub sillage: Option<f64>,

    /// Price/value score, 0.0 to 10.0
    #[validate(range(min = 0.0, max = 10.0))]
    pub price_value: Option<f64>,
}

/// Attribute to sort the list view by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Creation time (default)
    #[default]
    CreatedAt,
    /// Display name, lexicographic
    Name,
    /// Designer attribute, lexicographic
    Designer,
    /// Rating; unrated records sort last in descending order
    Rating,
}

/// Direction of the sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending (default, newest first)
    #[default]
    Desc,
}

/// Query parameters for the perfume list view
#[derive(Debug, Default, Deserialize, JsonSchema, Validate)]
#[serde(deny_unknown_fields)]
pub struct ListPerfumesQuery {
    /// Only return perfumes with exactly this designer
    #[validate(length(min = 1))]
    pub designer: Option<String>,

    /// Only return perfumes whose note set contains this note
    #[validate(length(min = 1))]
    pub note: Option<String>,

    /// Attribute to sort by
    #[serde(default)]
    pub sort_by: SortKey,

    /// Sort direction
    #[serde(default)]
    pub order: SortOrder,
}

/// Response for a single perfume
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PerfumeResponse {
    /// Unique ID of the perfume
    pub id: String,
    /// Display name of the fragrance
    pub name: String,
    /// Brand/creator attribute
    pub designer: String,
    /// Scent notes
    pub notes: Vec<String>,
    /// Free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Rating, 0.0 to 10.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Number of votes behind the rating
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_votes: Option<u32>,
    /// Numeric gender category
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
    /// Whether a photo has been uploaded for this perfume
    pub has_photo: bool,
    /// Timestamp of record creation
    pub created_at: i64,
    /// Timestamp of the last update
    pub updated_at: i64,
}

impl From<Perfume> for PerfumeResponse {
    fn from(perfume: Perfume) -> Self {
        Self {
            id: perfume.id,
            name: perfume.name,
            designer: perfume.designer,
            notes: perfume.notes,
            description: perfume.description,
            rating: perfume.rating,
            number_of_votes: perfume.number_of_votes,
            gender: perfume.gender,
            longevity: perfume.longevity,
            sillage: perfume.sillage,
            price_value: perfume.price_value,
            has_photo: perfume.photo_key.is_some(),
            created_at: perfume.created_at,
            updated_at: perfume.updated_at,
        }
    }
}

/// Response for the perfume list view
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PerfumeListResponse {
    /// Matching perfumes in the requested order
    pub perfumes: Vec<PerfumeResponse>,
}

/// Distinct designers across the caller's perfumes
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DesignerListResponse {
    /// Designer names, sorted Z to A
    pub designers: Vec<String>,
}

/// Distinct scent notes across the caller's perfumes
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct NoteListResponse {
    /// Note names, sorted Z to A
    pub notes: Vec<String>,
}

// Custom validator for the note set
fn validate_notes(notes: &[String]) -> Result<(), validator::ValidationError> {
    if notes.iter().any(|n| n.is_empty() || n.len() > 255) {
        let mut error = validator::ValidationError::new("invalid_note");
        error.message = Some(std::borrow::Cow::Borrowed(
            "Each note must be between 1 and 255 characters",
        ));
        return Err(error);
    }
    Ok(())
}

/// Drops duplicate notes while keeping first-seen order
fn dedupe_notes(notes: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(notes.len());
    for note in notes {
        if !seen.contains(&note) {
            seen.push(note);
        }
    }
    seen
}

/// Applies the list view's filter predicates and sort order
///
/// Records missing a rating compare below any rated record, so they come
/// last when sorting by rating descending.
fn apply_filters_and_sort(mut perfumes: Vec<Perfume>, query: &ListPerfumesQuery) -> Vec<Perfume> {
    if let Some(designer) = &query.designer {
        perfumes.retain(|p| &p.designer == designer);
    }

    if let Some(note) = &query.note {
        perfumes.retain(|p| p.notes.iter().any(|n| n == note));
    }

    let compare = |a: &Perfume, b: &Perfume| -> Ordering {
        match query.sort_by {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Designer => a.designer.cmp(&b.designer),
            SortKey::Rating => a
                .rating
                .unwrap_or(f64::NEG_INFINITY)
                .total_cmp(&b.rating.unwrap_or(f64::NEG_INFINITY)),
        }
    };

    match query.order {
        SortOrder::Asc => perfumes.sort_by(compare),
        SortOrder::Desc => perfumes.sort_by(|a, b| compare(b, a)),
    }

    perfumes
}

/// Create a new perfume owned by the caller
///
/// # Returns
///
/// Returns `201 CREATED` with the created perfume on success
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Invalid request parameters
/// - `401 UNAUTHORIZED` - Invalid or missing authentication
/// - `503 SERVICE_UNAVAILABLE` - Database connectivity issues
#[instrument(skip_all)]
pub async fn create_perfume(
    user: AuthenticatedUser,
    Extension(perfume_storage): Extension<Arc<PerfumeStorage>>,
    Valid(Json(payload)): Valid<Json<PerfumeAttributesRequest>>,
) -> Result<(StatusCode, Json<PerfumeResponse>), AppError> {
    let perfume = perfume_storage
        .create(PerfumeCreateRequest {
            owner_email: user.email,
            name: payload.name,
            designer: payload.designer,
            notes: dedupe_notes(payload.notes),
            description: payload.description,
            rating: payload.rating,
            number_of_votes: payload.number_of_votes,
            gender: payload.gender,
            longevity: payload.longevity,
            sillage: payload.sillage,
            price_value: payload.price_value,
        })
        .await?;

    tracing::info!(perfume_id = %perfume.id, "Created perfume");

    Ok((StatusCode::CREATED, Json(perfume.into())))
}

/// List the caller's perfumes with optional filters and sorting
///
/// Filters are exact matches on `designer` and set membership on `note`.
/// Results default to newest-first.
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Invalid query parameters
/// - `401 UNAUTHORIZED` - Invalid or missing authentication
/// - `503 SERVICE_UNAVAILABLE` - Database connectivity issues
#[instrument(skip_all)]
pub async fn list_perfumes(
    user: AuthenticatedUser,
    Extension(perfume_storage): Extension<Arc<PerfumeStorage>>,
    Valid(Query(query)): Valid<Query<ListPerfumesQuery>>,
) -> Result<Json<PerfumeListResponse>, AppError> {
    let perfumes = perfume_storage.list_by_owner(&user.email).await?;
    let perfumes = apply_filters_and_sort(perfumes, &query);

    Ok(Json(PerfumeListResponse {
        perfumes: perfumes.into_iter().map(Into::into).collect(),
    }))
}

/// Collects distinct values into reverse-sorted order
fn distinct_descending<I: IntoIterator<Item = String>>(values: I) -> Vec<String> {
    let set: std::collections::BTreeSet<String> = values.into_iter().collect();
    set.into_iter().rev().collect()
}

/// List the distinct designers across the caller's perfumes
///
/// # Errors
///
/// Returns an error if:
/// - `401 UNAUTHORIZED` - Invalid or missing authentication
/// - `503 SERVICE_UNAVAILABLE` - Database connectivity issues
#[instrument(skip_all)]
pub async fn list_designers(
    user: AuthenticatedUser,
    Extension(perfume_storage): Extension<Arc<PerfumeStorage>>,
) -> Result<Json<DesignerListResponse>, AppError> {
    let perfumes = perfume_storage.list_by_owner(&user.email).await?;

    Ok(Json(DesignerListResponse {
        designers: distinct_descending(perfumes.into_iter().map(|p| p.designer)),
    }))
}

/// List the distinct scent notes across the caller's perfumes
///
/// # Errors
///
/// Returns an error if:
/// - `401 UNAUTHORIZED` - Invalid or missing authentication
/// - `503 SERVICE_UNAVAILABLE` - Database connectivity issues
#[instrument(skip_all)]
pub async fn list_notes(
    user: AuthenticatedUser,
    Extension(perfume_storage): Extension<Arc<PerfumeStorage>>,
) -> Result<Json<NoteListResponse>, AppError> {
    let perfumes = perfume_storage.list_by_owner(&user.email).await?;

    Ok(Json(NoteListResponse {
        notes: distinct_descending(perfumes.into_iter().flat_map(|p| p.notes)),
    }))
}

/// Get a single perfume by ID
///
/// # Errors
///
/// Returns an error if:
/// - `401 UNAUTHORIZED` - Invalid or missing authentication
/// - `403 FORBIDDEN` - The perfume belongs to another user
/// - `404 NOT_FOUND` - No perfume with this ID exists
/// - `503 SERVICE_UNAVAILABLE` - Database connectivity issues
#[instrument(skip_all)]
pub async fn get_perfume(
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Extension(perfume_storage): Extension<Arc<PerfumeStorage>>,
) -> Result<Json<PerfumeResponse>, AppError> {
    let perfume = load_owned_perfume(&perfume_storage, &user, &id).await?;
    Ok(Json(perfume.into()))
}

/// Update the mutable attributes of a perfume
///
/// Ownership and the photo never change through this endpoint.
///
/// # Errors
///
/// Returns an error if:
/// - `400 BAD_REQUEST` - Invalid request parameters
/// - `401 UNAUTHORIZED` - Invalid or missing authentication
/// - `403 FORBIDDEN` - The perfume belongs to another user
/// - `404 NOT_FOUND` - No perfume with this ID exists
/// - `503 SERVICE_UNAVAILABLE` - Database connectivity issues
#[instrument(skip_all)]
pub async fn update_perfume(
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Extension(perfume_storage): Extension<Arc<PerfumeStorage>>,
    Valid(Json(payload)): Valid<Json<PerfumeAttributesRequest>>,
) -> Result<Json<PerfumeResponse>, AppError> {
    let existing = load_owned_perfume(&perfume_storage, &user, &id).await?;

    let updated = perfume_storage
        .update(
            existing,
            PerfumeUpdateRequest {
                name: payload.name,
                designer: payload.designer,
                notes: dedupe_notes(payload.notes),
                description: payload.description,
                rating: payload.rating,
                number_of_votes: payload.number_of_votes,
                gender: payload.gender,
                longevity: payload.longevity,
                sillage: payload.sillage,
                price_value: payload.price_value,
            },
        )
        .await?;

    Ok(Json(updated.into()))
}

/// Delete a perfume and its photo
///
/// # Returns
///
/// Returns `204 NO_CONTENT` on successful deletion
///
/// # Errors
///
/// Returns an error if:
/// - `401 UNAUTHORIZED` - Invalid or missing authentication
/// - `403 FORBIDDEN` - The perfume belongs to another user
/// - `404 NOT_FOUND` - No perfume with this ID exists
/// - `503 SERVICE_UNAVAILABLE` - Storage connectivity issues
#[instrument(skip_all)]
pub async fn delete_perfume(
    user: AuthenticatedUser,
    Path(id): Path<String>,
    Extension(perfume_storage): Extension<Arc<PerfumeStorage>>,
    Extension(photo_storage): Extension<Arc<PhotoStorage>>,
) -> Result<StatusCode, AppError> {
    let perfume = load_owned_perfume(&perfume_storage, &user, &id).await?;

    // Delete the photo object first, then the record,
    // so the photo lifecycle stays tied to the perfume
    if let Some(photo_key) = &perfume.photo_key {
        photo_storage.delete(photo_key).await?;
    }
    perfume_storage.delete(&perfume.id).await?;

    tracing::info!(perfume_id = %perfume.id, "Deleted perfume");

    Ok(StatusCode::NO_CONTENT)
}

/// Fetches a perfume and enforces the ownership rule
///
/// Missing records map to 404; records owned by another user map to 403.
pub(super) async fn load_owned_perfume(
    perfume_storage: &PerfumeStorage,
    user: &AuthenticatedUser,
    id: &str,
) -> Result<Perfume, AppError> {
    let Some(perfume) = perfume_storage.get_one(id).await? else {
        return Err(AppError::new(
            StatusCode::NOT_FOUND,
            "perfume_not_found",
            "Perfume not found",
            false,
        ));
    };

    if perfume.owner_email != user.email {
        return Err(AppError::new(
            StatusCode::FORBIDDEN,
            "forbidden",
            "You do not have permission to access this perfume",
            false,
        ));
    }

    Ok(perfume)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perfume(id: &str, name: &str, designer: &str, notes: &[&str], created_at: i64) -> Perfume {
        Perfume {
            id: id.to_string(),
            owner_email: "user@example.com".to_string(),
            name: name.to_string(),
            designer: designer.to_string(),
            notes: notes.iter().map(ToString::to_string).collect(),
            description: None,
            rating: None,
            number_of_votes: None,
            gender: None,
            longevity: None,
            sillage: None,
            price_value: None,
            photo_key: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn ids(perfumes: &[Perfume]) -> Vec<&str> {
        perfumes.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_designer_filter_returns_exact_subset() {
        let records = vec![
            perfume("a", "Sauvage", "Dior", &[], 1),
            perfume("b", "Bleu", "Chanel", &[], 2),
            perfume("c", "Homme", "Dior", &[], 3),
        ];

        let query = ListPerfumesQuery {
            designer: Some("Dior".to_string()),
            order: SortOrder::Asc,
            ..Default::default()
        };

        let result = apply_filters_and_sort(records, &query);
        assert_eq!(ids(&result), vec!["a", "c"]);
    }

    #[test]
    fn test_designer_filter_no_match_is_empty() {
        let records = vec![perfume("a", "Sauvage", "Dior", &[], 1)];

        let query = ListPerfumesQuery {
            designer: Some("Creed".to_string()),
            ..Default::default()
        };

        assert!(apply_filters_and_sort(records, &query).is_empty());
    }

    #[test]
    fn test_note_filter_matches_set_membership() {
        let records = vec![
            perfume("a", "One", "X", &["vetiver", "citrus"], 1),
            perfume("b", "Two", "X", &["vanilla"], 2),
            perfume("c", "Three", "X", &["citrus"], 3),
        ];

        let query = ListPerfumesQuery {
            note: Some("citrus".to_string()),
            order: SortOrder::Asc,
            ..Default::default()
        };

        let result = apply_filters_and_sort(records, &query);
        assert_eq!(ids(&result), vec!["a", "c"]);
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let records = vec![
            perfume("old", "Old", "X", &[], 1),
            perfume("new", "New", "X", &[], 3),
            perfume("mid", "Mid", "X", &[], 2),
        ];

        let result = apply_filters_and_sort(records, &ListPerfumesQuery::default());
        assert_eq!(ids(&result), vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_sort_by_name_ascending() {
        let records = vec![
            perfume("b", "Bravo", "X", &[], 1),
            perfume("a", "Alpha", "X", &[], 2),
            perfume("c", "Charlie", "X", &[], 3),
        ];

        let query = ListPerfumesQuery {
            sort_by: SortKey::Name,
            order: SortOrder::Asc,
            ..Default::default()
        };

        let result = apply_filters_and_sort(records, &query);
        assert_eq!(ids(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_sort_by_name_descending() {
        let records = vec![
            perfume("a", "Alpha", "X", &[], 1),
            perfume("c", "Charlie", "X", &[], 2),
            perfume("b", "Bravo", "X", &[], 3),
        ];

        let query = ListPerfumesQuery {
            sort_by: SortKey::Name,
            ..Default::default()
        };

        let result = apply_filters_and_sort(records, &query);
        assert_eq!(ids(&result), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_sort_by_designer_ascending() {
        let records = vec![
            perfume("c", "One", "Chanel", &[], 1),
            perfume("a", "Two", "Amouage", &[], 2),
            perfume("d", "Three", "Dior", &[], 3),
        ];

        let query = ListPerfumesQuery {
            sort_by: SortKey::Designer,
            order: SortOrder::Asc,
            ..Default::default()
        };

        let result = apply_filters_and_sort(records, &query);
        assert_eq!(ids(&result), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_sort_by_created_at_ascending() {
        let records = vec![
            perfume("new", "New", "X", &[], 3),
            perfume("old", "Old", "X", &[], 1),
        ];

        let query = ListPerfumesQuery {
            order: SortOrder::Asc,
            ..Default::default()
        };

        let result = apply_filters_and_sort(records, &query);
        assert_eq!(ids(&result), vec!["old", "new"]);
    }

    #[test]
    fn test_sort_by_rating_desc_puts_unrated_last() {
        let mut high = perfume("high", "High", "X", &[], 1);
        high.rating = Some(9.1);
        let mut low = perfume("low", "Low", "X", &[], 2);
        low.rating = Some(3.0);
        let unrated = perfume("none", "None", "X", &[], 3);

        let query = ListPerfumesQuery {
            sort_by: SortKey::Rating,
            ..Default::default()
        };

        let result = apply_filters_and_sort(vec![low, unrated, high], &query);
        assert_eq!(ids(&result), vec!["high", "low", "none"]);
    }

    #[test]
    fn test_sort_by_rating_asc_puts_unrated_first() {
        let mut rated = perfume("rated", "Rated", "X", &[], 1);
        rated.rating = Some(5.0);
        let unrated = perfume("none", "None", "X", &[], 2);

        let query = ListPerfumesQuery {
            sort_by: SortKey::Rating,
            order: SortOrder::Asc,
            ..Default::default()
        };

        let result = apply_filters_and_sort(vec![rated, unrated], &query);
        assert_eq!(ids(&result), vec!["none", "rated"]);
    }

    #[test]
    fn test_combined_filters() {
        let records = vec![
            perfume("a", "One", "Dior", &["citrus"], 1),
            perfume("b", "Two", "Dior", &["vanilla"], 2),
            perfume("c", "Three", "Chanel", &["citrus"], 3),
        ];

        let query = ListPerfumesQuery {
            designer: Some("Dior".to_string()),
            note: Some("citrus".to_string()),
            ..Default::default()
        };

        let result = apply_filters_and_sort(records, &query);
        assert_eq!(ids(&result), vec!["a"]);
    }

    #[test]
    fn test_dedupe_notes_keeps_first_seen_order() {
        let notes = vec![
            "vetiver".to_string(),
            "citrus".to_string(),
            "vetiver".to_string(),
        ];
        assert_eq!(dedupe_notes(notes), vec!["vetiver", "citrus"]);
    }

    #[test]
    fn test_distinct_descending_dedupes_and_reverse_sorts() {
        let values = vec![
            "Chanel".to_string(),
            "Dior".to_string(),
            "Chanel".to_string(),
            "Amouage".to_string(),
        ];
        assert_eq!(
            distinct_descending(values),
            vec!["Dior", "Chanel", "Amouage"]
        );
    }

    #[test]
    fn test_validate_notes_rejects_empty_note() {
        assert!(validate_notes(&[String::new()]).is_err());
        assert!(validate_notes(&["vetiver".to_string()]).is_ok());
    }
}
