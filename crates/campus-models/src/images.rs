//! Gallery images.

use campus_core::serde::deserialize_optional_string;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Image {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub public_id: String,
    pub album_id: Uuid,
    pub uploaded_by: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ImageWithRelations {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub image: Image,
    pub album_title: Option<String>,
    pub uploaded_by_name: Option<String>,
}

/// Text fields of the upload form. The file part is required.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateImageDto {
    pub album_id: Uuid,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BulkDeleteImagesDto {
    #[validate(length(min = 1, max = 100, message = "image_ids must not be empty"))]
    pub image_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ImageDeletionSummary {
    pub image_id: Uuid,
    pub deleted_from_db: bool,
    pub deleted_from_host: bool,
    /// Set when the host delete failed; the row is removed regardless
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteSummary {
    pub requested: usize,
    pub found: usize,
    pub deleted_from_db: u64,
    pub deleted_from_host: usize,
    pub not_found: Vec<Uuid>,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bulk_delete_requires_ids() {
        let dto: BulkDeleteImagesDto = serde_json::from_value(json!({"image_ids": []})).unwrap();
        assert!(dto.validate().unwrap_err().field_errors().contains_key("image_ids"));

        let dto: BulkDeleteImagesDto =
            serde_json::from_value(json!({"image_ids": [Uuid::new_v4()]})).unwrap();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_image_parses_form_album_id() {
        let album_id = Uuid::new_v4();
        let dto: CreateImageDto = serde_json::from_value(json!({
            "album_id": album_id.to_string(),
            "title": ""
        }))
        .unwrap();
        assert_eq!(dto.album_id, album_id);
        assert!(dto.title.is_none());
    }
}
