//! Faculty profiles.
//!
//! Teachers are created and updated through multipart forms, so every
//! optional text field treats an empty value as absent.

use campus_core::serde::deserialize_optional_string;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Teacher {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    #[serde(skip_serializing)]
    pub image_public_id: Option<String>,
    /// Designation, e.g. "Assistant Professor"
    pub role: String,
    pub specialization: String,
    pub experience: String,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub instagram: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Text fields of the create form. The `image` file part is required and
/// handled separately.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTeacherDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub role: String,
    #[validate(length(min = 1, max = 200))]
    pub specialization: String,
    #[validate(length(min = 1, max = 50))]
    pub experience: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url)]
    pub facebook: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url)]
    pub linkedin: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url)]
    pub twitter: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url)]
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTeacherDto {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 1, max = 100))]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 1, max = 200))]
    pub specialization: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(length(min = 1, max = 50))]
    pub experience: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url)]
    pub facebook: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url)]
    pub linkedin: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url)]
    pub twitter: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    #[validate(url)]
    pub instagram: Option<String>,
}

impl UpdateTeacherDto {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.role.is_none()
            && self.specialization.is_none()
            && self.experience.is_none()
            && self.facebook.is_none()
            && self.linkedin.is_none()
            && self.twitter.is_none()
            && self.instagram.is_none()
    }
}
