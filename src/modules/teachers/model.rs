pub use campus_models::teachers::{CreateTeacherDto, Teacher, UpdateTeacherDto};

/// Media host folder for teacher portraits.
pub const TEACHER_IMAGE_FOLDER: &str = "teachers";
