pub use campus_auth::Claims;
pub use campus_models::auth::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
pub use campus_models::users::{PublicUser, User, UserRole};
