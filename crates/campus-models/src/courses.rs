//! Course catalogue.

use campus_core::PaginationMeta;
use campus_core::serde::deserialize_optional_string;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub course_name: String,
    pub description: String,
    pub duration: String,
    pub course_fee: f64,
    pub total_semesters: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Bachelor of Computer Applications")]
    pub course_name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    #[schema(example = "3 years")]
    pub duration: String,
    #[validate(range(exclusive_min = 0.0))]
    pub course_fee: f64,
    #[validate(range(min = 1, max = 20))]
    pub total_semesters: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 200))]
    pub course_name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub duration: Option<String>,
    #[validate(range(exclusive_min = 0.0))]
    pub course_fee: Option<f64>,
    #[validate(range(min = 1, max = 20))]
    pub total_semesters: Option<i32>,
}

impl UpdateCourseDto {
    pub fn is_empty(&self) -> bool {
        self.course_name.is_none()
            && self.description.is_none()
            && self.duration.is_none()
            && self.course_fee.is_none()
            && self.total_semesters.is_none()
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseFilterParams {
    /// Case-insensitive substring match on the course name
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCoursesResponse {
    pub data: Vec<Course>,
    pub meta: PaginationMeta,
}
