//! # Campus Config
//!
//! Configuration types for the Campus API, loaded from environment variables:
//!
//! - [`jwt`]: JWT signing secret, token lifetime and cookie flags
//! - [`cors`]: CORS allowed origins
//! - [`email`]: SMTP settings
//! - [`rate_limit`]: API rate limiting
//! - [`payment`]: Payment gateway credentials
//! - [`media`]: Media backend selection and upload limits
//!
//! # Example
//!
//! ```ignore
//! use campus_config::{JwtConfig, PaymentConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let payment_config = PaymentConfig::from_env();
//! ```

pub mod cors;
pub mod email;
pub mod jwt;
pub mod media;
pub mod payment;
pub mod rate_limit;

pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use media::{MediaBackend, MediaConfig};
pub use payment::{GatewayEnvironment, PaymentConfig};
pub use rate_limit::RateLimitConfig;

pub(crate) fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(default)
}
