pub mod admissions;
pub mod albums;
pub mod auth;
pub mod courses;
pub mod fees;
pub mod images;
pub mod stats;
pub mod students;
pub mod teachers;
pub mod testimonials;

pub use self::auth::model::LoginRequest;
