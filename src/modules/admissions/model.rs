pub use campus_core::{PaginationMeta, PaginationParams};
pub use campus_models::students::{
    AdmissionFilterParams, AdmissionStatus, CreateAdmissionDto, PaginatedStudentsResponse,
    Student, StudentWithCourse, UpdateAdmissionStatusDto,
};

/// Length of the password generated for accounts created on acceptance.
pub const GENERATED_PASSWORD_LENGTH: usize = 10;

/// Attempts at drawing a free `unique_id` before giving up.
pub const UNIQUE_ID_ATTEMPTS: usize = 5;

pub(crate) const STUDENT_WITH_COURSE_SELECT: &str = r#"
    SELECT s.*, c.course_name
    FROM students s
    JOIN courses c ON c.id = s.course_id
"#;
