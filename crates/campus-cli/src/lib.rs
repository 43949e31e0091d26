//! # Campus CLI
//!
//! Administrative commands and demo data seeding for the Campus API.
//!
//! ## Usage
//!
//! ```ignore
//! use campus_cli::seeder::{SeedConfig, seed_all};
//!
//! let config = SeedConfig::default().with_courses(12);
//! seed_all(&pool, config).await?;
//! ```

pub mod admin;
pub mod seeder;
