//! Authentication and authorization for request handlers.
//!
//! - [`auth`]: `AuthUser` extractor (bearer header, bare header or `token` cookie)
//! - [`role`]: Admin gate, as route middleware or as an extractor
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//! use crate::middleware::role::AdminUser;
//!
//! async fn me(auth_user: AuthUser) -> impl IntoResponse { /* ... */ }
//!
//! async fn create_course(AdminUser(admin): AdminUser) -> impl IntoResponse { /* ... */ }
//! ```

pub mod auth;
pub mod role;
