//! Shared helpers for the HTTP layer.
//!
//! - [`email`]: Transactional mail over SMTP
//! - [`generate`]: Student ids and generated passwords
//! - [`upload`]: Multipart forms with an image attachment

pub mod email;
pub mod generate;
pub mod upload;
