pub use campus_core::{PaginationMeta, PaginationParams};
pub use campus_models::students::{
    AdmissionStatus, PaginatedStudentsResponse, StudentFilterParams, StudentWithCourse,
    UpdateStudentDto,
};
