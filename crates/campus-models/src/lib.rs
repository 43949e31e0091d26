//! # Campus Models
//!
//! Database entities and request/response DTOs for the Campus API.
//!
//! - [`users`]: Accounts and roles
//! - [`auth`]: Registration and login payloads
//! - [`courses`]: Course catalogue
//! - [`teachers`]: Faculty profiles
//! - [`students`]: Admissions and enrolled students
//! - [`fees`]: Fee records, payment orders, bills and earnings
//! - [`albums`] / [`images`]: Photo gallery
//! - [`testimonials`]: Public testimonials
//! - [`stats`]: Admin dashboard counters

pub mod albums;
pub mod auth;
pub mod courses;
pub mod fees;
pub mod images;
pub mod stats;
pub mod students;
pub mod teachers;
pub mod testimonials;
pub mod users;

pub use auth::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
pub use users::{PublicUser, User, UserRole};

pub use courses::{
    Course, CourseFilterParams, CreateCourseDto, PaginatedCoursesResponse, UpdateCourseDto,
};
pub use teachers::{CreateTeacherDto, Teacher, UpdateTeacherDto};

pub use students::{
    AdmissionFilterParams, AdmissionStatus, CreateAdmissionDto, PaginatedStudentsResponse,
    Student, StudentFilterParams, StudentWithCourse, UpdateAdmissionStatusDto, UpdateStudentDto,
};

pub use fees::{
    Bill, BillQuery, CreateOrderDto, DailyEarning, EarningsQuery, EarningsReport, Fee,
    FeeLookupQuery, OfflinePaymentDto, OrderResponse, PaymentStatus, StudentFeeInfo,
    VerifyOrderDto, VerifyOrderResponse,
};

pub use albums::{Album, AlbumDeletionSummary, AlbumImage, AlbumWithImages, CreateAlbumDto};
pub use images::{
    BulkDeleteImagesDto, BulkDeleteSummary, CreateImageDto, Image, ImageDeletionSummary,
    ImageWithRelations,
};
pub use testimonials::{CreateTestimonialDto, DEFAULT_AVATAR_URL, Testimonial};

pub use stats::DashboardStats;
