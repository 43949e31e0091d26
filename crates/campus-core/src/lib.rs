//! # Campus Core
//!
//! Core types, errors, and utilities for the Campus API.
//!
//! This crate provides foundational types used throughout the application:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`media`]: Media storage abstraction and the local filesystem backend
//! - [`pagination`]: Pagination utilities for API responses
//! - [`password`]: Password hashing and verification
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use campus_core::errors::AppError;
//! use campus_core::pagination::PaginationParams;
//! use campus_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//! let hash = hash_password("secure_password")?;
//! let limit = PaginationParams::default().limit();
//! ```

pub mod errors;
pub mod media;
pub mod pagination;
pub mod password;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use media::{DeleteOutcome, LocalMediaStore, MediaStore, StorageError, StoredMedia};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
