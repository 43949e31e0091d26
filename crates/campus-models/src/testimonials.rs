//! Public testimonials.

use campus_core::serde::deserialize_lenient_i32;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Avatar used when a testimonial is submitted without an image.
pub const DEFAULT_AVATAR_URL: &str =
    "https://i.pinimg.com/originals/25/78/61/25786134576ce0344893b33a051160b1.jpg";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Testimonial {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: String,
    #[serde(skip_serializing)]
    pub image_public_id: Option<String>,
    pub message: String,
    pub job_role: String,
    pub star: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTestimonialDto {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Email must be valid"))]
    pub email: String,
    #[validate(length(min = 1, max = 2000, message = "Message is required"))]
    pub message: String,
    #[validate(length(min = 1, max = 100, message = "Job role is required"))]
    pub job_role: String,
    #[serde(deserialize_with = "deserialize_lenient_i32")]
    #[validate(range(min = 0, max = 5, message = "Star rating must be between 0 and 5"))]
    pub star: i32,
}
