//! Admissions and enrolled students.
//!
//! An admission application and an enrolled student are the same row:
//! the application is `pending` until an admin accepts or rejects it. The
//! row also carries the fee snapshot taken from the course at application
//! time.

use campus_core::PaginationMeta;
use campus_core::serde::deserialize_optional_uuid;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "admission_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AdmissionStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    /// Human-readable identifier, `STU<year><6 digits>`
    pub unique_id: String,
    pub first_name: String,
    pub last_name: String,
    pub father_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: chrono::NaiveDate,
    pub gender: String,
    pub address: String,
    pub course_id: Uuid,
    pub semester: i32,
    pub admission_status: AdmissionStatus,
    pub course_fee: f64,
    pub amount_paid: f64,
    pub amount_due: f64,
    pub user_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentWithCourse {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub student: Student,
    pub course_name: String,
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("Phone must be 10 to 15 digits".into());
        Err(err)
    }
}

fn validate_gender(gender: &str) -> Result<(), ValidationError> {
    match gender.to_lowercase().as_str() {
        "male" | "female" | "other" => Ok(()),
        _ => {
            let mut err = ValidationError::new("gender");
            err.message = Some("Gender must be male, female or other".into());
            Err(err)
        }
    }
}

fn default_semester() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAdmissionDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 1, max = 100))]
    pub father_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    #[schema(example = "9876543210")]
    pub phone: String,
    pub date_of_birth: chrono::NaiveDate,
    #[validate(custom(function = "validate_gender"))]
    pub gender: String,
    #[validate(length(min = 1, max = 500))]
    pub address: String,
    pub course_id: Uuid,
    #[serde(default = "default_semester")]
    #[validate(range(min = 1, max = 20))]
    pub semester: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateAdmissionStatusDto {
    /// `accepted` or `rejected`
    pub status: AdmissionStatus,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(custom(function = "validate_phone"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    #[validate(range(min = 1, max = 20))]
    pub semester: Option<i32>,
}

impl UpdateStudentDto {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.address.is_none() && self.semester.is_none()
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdmissionFilterParams {
    pub status: Option<AdmissionStatus>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub course_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<StudentWithCourse>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn admission_json() -> serde_json::Value {
        json!({
            "first_name": "Karan",
            "last_name": "Mehta",
            "father_name": "Suresh Mehta",
            "email": "karan@example.com",
            "phone": "9876543210",
            "date_of_birth": "2004-05-17",
            "gender": "Male",
            "address": "12 MG Road, Pune",
            "course_id": Uuid::new_v4(),
        })
    }

    #[test]
    fn test_create_admission_defaults_semester() {
        let dto: CreateAdmissionDto = serde_json::from_value(admission_json()).unwrap();
        assert_eq!(dto.semester, 1);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_admission_rejects_bad_phone() {
        let mut value = admission_json();
        value["phone"] = json!("98-765");
        let dto: CreateAdmissionDto = serde_json::from_value(value).unwrap();
        assert!(dto.validate().unwrap_err().field_errors().contains_key("phone"));
    }

    #[test]
    fn test_create_admission_rejects_unknown_gender() {
        let mut value = admission_json();
        value["gender"] = json!("robot");
        let dto: CreateAdmissionDto = serde_json::from_value(value).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_phone_accepts_country_code() {
        assert!(validate_phone("+919876543210").is_ok());
        assert!(validate_phone("12345").is_err());
    }

    #[test]
    fn test_admission_status_serde() {
        let dto: UpdateAdmissionStatusDto =
            serde_json::from_value(json!({"status": "accepted"})).unwrap();
        assert_eq!(dto.status, AdmissionStatus::Accepted);
        assert!(serde_json::from_value::<UpdateAdmissionStatusDto>(json!({"status": "maybe"})).is_err());
    }

    #[test]
    fn test_blank_course_filter_means_any() {
        let filters: StudentFilterParams =
            serde_json::from_value(json!({"course_id": ""})).unwrap();
        assert!(filters.course_id.is_none());

        let id = Uuid::new_v4();
        let filters: StudentFilterParams =
            serde_json::from_value(json!({"course_id": id.to_string()})).unwrap();
        assert_eq!(filters.course_id, Some(id));
    }

    #[test]
    fn test_update_student_is_empty() {
        assert!(UpdateStudentDto::default().is_empty());
        let dto = UpdateStudentDto {
            semester: Some(3),
            ..Default::default()
        };
        assert!(!dto.is_empty());
    }
}
