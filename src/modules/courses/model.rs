pub use campus_core::{PaginationMeta, PaginationParams};
pub use campus_models::courses::{
    Course, CourseFilterParams, CreateCourseDto, PaginatedCoursesResponse, UpdateCourseDto,
};
