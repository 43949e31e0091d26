//! Photo gallery albums.

use campus_core::serde::deserialize_optional_string;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Album {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub cover_image_url: Option<String>,
    #[serde(skip_serializing)]
    pub cover_image_public_id: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAlbumDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AlbumImage {
    pub id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlbumWithImages {
    #[serde(flatten)]
    pub album: Album,
    pub created_by_name: Option<String>,
    pub images: Vec<AlbumImage>,
}

/// Outcome of deleting an album together with its images.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AlbumDeletionSummary {
    pub album_deleted: bool,
    pub total_images: usize,
    pub images_deleted_from_db: u64,
    pub images_deleted_from_host: usize,
    pub host_errors: Vec<String>,
}
