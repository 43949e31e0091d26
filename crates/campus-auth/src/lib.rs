//! # Campus Auth
//!
//! JWT claims and token utilities.
//!
//! - [`claims`]: Access token claims
//! - [`jwt`]: Token creation and verification
//!
//! ```ignore
//! use campus_auth::{create_access_token, verify_token};
//! use campus_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "user@example.com", "admin", &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, extract_token, verify_token};
