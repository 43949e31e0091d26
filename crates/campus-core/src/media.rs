//! Media storage abstraction.
//!
//! Uploaded images (teacher portraits, album covers, gallery images,
//! testimonial avatars) go through a [`MediaStore`] so that handlers don't
//! care whether the bytes end up on local disk or on a remote image host.
//!
//! # Example
//!
//! ```ignore
//! use campus_core::media::{LocalMediaStore, MediaStore};
//! use std::path::PathBuf;
//!
//! let store = LocalMediaStore::new(
//!     PathBuf::from("./storage/uploads"),
//!     "http://localhost:3000/uploads".to_string(),
//! );
//!
//! let stored = store.upload("teachers", "portrait.png", &bytes).await?;
//! let outcome = store.delete(&stored.public_id).await?;
//! ```

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use axum::http::StatusCode;
use serde::Serialize;
use tokio::fs;
use utoipa::ToSchema;

use crate::errors::AppError;

/// MIME types accepted for every image upload.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/webp", "image/gif"];

/// Default upload size cap (5 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A file that has been handed to a media backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StoredMedia {
    /// Public URL the file is served from
    pub url: String,
    /// Backend identifier used to delete the file later
    pub public_id: String,
}

/// Result of a delete call.
///
/// A file that is already gone counts as deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DeleteOutcome {
    pub deleted: bool,
    pub message: String,
}

/// Abstract trait for media backends.
///
/// Implementations can be swapped without changing business logic.
pub trait MediaStore: Send + Sync + fmt::Debug {
    /// Store `content` under `folder` and return its URL and public id.
    ///
    /// `file_name` is the client-supplied name; only its extension is kept.
    fn upload<'a>(
        &'a self,
        folder: &'a str,
        file_name: &'a str,
        content: &'a [u8],
    ) -> BoxFuture<'a, Result<StoredMedia, StorageError>>;

    /// Delete a file by public id or by the URL it was served from.
    fn delete<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, Result<DeleteOutcome, StorageError>>;
}

/// Error type for media storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// File exceeds maximum allowed size.
    InvalidFileSize { max_bytes: usize },

    /// MIME type not allowed.
    InvalidMimeType {
        received: String,
        allowed: Vec<String>,
    },

    /// I/O error (file system or similar).
    IoError(std::io::Error),

    /// Invalid storage key format.
    InvalidKey(String),

    /// The remote image host rejected the request or could not be reached.
    Upstream(String),
}

impl StorageError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidFileSize { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::InvalidMimeType { .. } | Self::InvalidKey(_) => StatusCode::BAD_REQUEST,
            Self::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn into_app_error(self) -> AppError {
        AppError::new(self.status_code(), self)
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileSize { max_bytes } => {
                write!(f, "File exceeds maximum size of {} bytes", max_bytes)
            }
            Self::InvalidMimeType { received, allowed } => {
                write!(
                    f,
                    "MIME type '{}' not allowed. Allowed types: {}",
                    received,
                    allowed.join(", ")
                )
            }
            Self::IoError(e) => write!(f, "I/O error: {}", e),
            Self::InvalidKey(msg) => write!(f, "Invalid storage key: {}", msg),
            Self::Upstream(msg) => write!(f, "Media host error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e)
    }
}

/// Check an incoming upload against the allowed image types and size cap.
pub fn validate_image(content_type: &str, size: usize, max_bytes: usize) -> Result<(), StorageError> {
    if size > max_bytes {
        return Err(StorageError::InvalidFileSize { max_bytes });
    }

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if !ALLOWED_IMAGE_TYPES.contains(&mime.as_str()) {
        return Err(StorageError::InvalidMimeType {
            received: content_type.to_string(),
            allowed: ALLOWED_IMAGE_TYPES.iter().map(|s| s.to_string()).collect(),
        });
    }

    Ok(())
}

/// Lower-cased extension of a client file name, restricted to ASCII
/// alphanumerics.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Local filesystem media backend.
///
/// Files land under `base_dir/<folder>/<uuid>.<ext>` and are served by the
/// HTTP server under `base_url`.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    base_dir: PathBuf,
    base_url: String,
    max_file_size: usize,
}

impl LocalMediaStore {
    pub fn new(base_dir: PathBuf, base_url: String) -> Self {
        Self::with_max_size(base_dir, base_url, DEFAULT_MAX_UPLOAD_BYTES)
    }

    pub fn with_max_size(base_dir: PathBuf, base_url: String, max_file_size: usize) -> Self {
        Self {
            base_dir,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_file_size,
        }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Validate storage key format to prevent path traversal.
    fn validate_key(key: &str) -> Result<(), StorageError> {
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.starts_with('\\') {
            return Err(StorageError::InvalidKey(
                "Key must not be empty, contain '..', or start with '/'".to_string(),
            ));
        }

        if !key
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.')
        {
            return Err(StorageError::InvalidKey(
                "Key contains invalid characters".to_string(),
            ));
        }

        Ok(())
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Accepts either a bare key or a URL produced by [`Self::url_for`].
    fn key_from_reference<'a>(&self, reference: &'a str) -> &'a str {
        reference
            .strip_prefix(self.base_url.as_str())
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(reference)
    }
}

impl MediaStore for LocalMediaStore {
    fn upload<'a>(
        &'a self,
        folder: &'a str,
        file_name: &'a str,
        content: &'a [u8],
    ) -> BoxFuture<'a, Result<StoredMedia, StorageError>> {
        Box::pin(async move {
            if content.len() > self.max_file_size {
                return Err(StorageError::InvalidFileSize {
                    max_bytes: self.max_file_size,
                });
            }

            let name = match file_extension(file_name) {
                Some(ext) => format!("{}.{}", uuid::Uuid::new_v4(), ext),
                None => uuid::Uuid::new_v4().to_string(),
            };
            let key = format!("{}/{}", folder.trim_matches('/'), name);
            Self::validate_key(&key)?;

            let file_path = self.base_dir.join(&key);
            if let Some(parent) = file_path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&file_path, content).await?;

            tracing::debug!(key = %key, bytes = content.len(), "Stored media file");

            Ok(StoredMedia {
                url: self.url_for(&key),
                public_id: key,
            })
        })
    }

    fn delete<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, Result<DeleteOutcome, StorageError>> {
        Box::pin(async move {
            let key = self.key_from_reference(reference);
            Self::validate_key(key)?;

            match fs::remove_file(self.base_dir.join(key)).await {
                Ok(_) => Ok(DeleteOutcome {
                    deleted: true,
                    message: "ok".to_string(),
                }),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DeleteOutcome {
                    deleted: true,
                    message: "not found".to_string(),
                }),
                Err(e) => Err(e.into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> LocalMediaStore {
        let dir = std::env::temp_dir().join(format!("campus-media-{}", uuid::Uuid::new_v4()));
        LocalMediaStore::with_max_size(dir, "http://localhost:3000/uploads/".to_string(), 16)
    }

    #[test]
    fn test_validate_key_accepts_valid_keys() {
        assert!(LocalMediaStore::validate_key("teachers/portrait.png").is_ok());
        assert!(LocalMediaStore::validate_key("albums/abc-123.jpg").is_ok());
        assert!(LocalMediaStore::validate_key("testimonials/avatar_1.webp").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_path_traversal() {
        assert!(LocalMediaStore::validate_key("../../../etc/passwd").is_err());
        assert!(LocalMediaStore::validate_key("..\\windows\\system32").is_err());
    }

    #[test]
    fn test_validate_key_rejects_absolute_paths() {
        assert!(LocalMediaStore::validate_key("/etc/passwd").is_err());
        assert!(LocalMediaStore::validate_key("\\windows\\system32").is_err());
        assert!(LocalMediaStore::validate_key("").is_err());
    }

    #[test]
    fn test_key_from_reference_strips_base_url() {
        let store = temp_store();
        assert_eq!(
            store.key_from_reference("http://localhost:3000/uploads/teachers/a.png"),
            "teachers/a.png"
        );
        assert_eq!(store.key_from_reference("teachers/a.png"), "teachers/a.png");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Portrait.PNG").as_deref(), Some("png"));
        assert_eq!(file_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(file_extension("noext"), None);
        assert_eq!(file_extension("bad.p/ng"), None);
    }

    #[test]
    fn test_validate_image() {
        assert!(validate_image("image/png", 10, 100).is_ok());
        assert!(validate_image("image/jpeg; charset=binary", 10, 100).is_ok());
        assert!(matches!(
            validate_image("application/pdf", 10, 100),
            Err(StorageError::InvalidMimeType { .. })
        ));
        assert!(matches!(
            validate_image("image/png", 101, 100),
            Err(StorageError::InvalidFileSize { max_bytes: 100 })
        ));
    }

    #[test]
    fn test_storage_error_status_codes() {
        assert_eq!(
            StorageError::Upstream("down".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            StorageError::InvalidKey("x".into()).into_app_error().status,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_upload_then_delete() {
        let store = temp_store();

        let stored = store.upload("teachers", "me.png", b"png-bytes").await.unwrap();
        assert!(stored.public_id.starts_with("teachers/"));
        assert!(stored.public_id.ends_with(".png"));
        assert_eq!(
            stored.url,
            format!("http://localhost:3000/uploads/{}", stored.public_id)
        );
        assert!(store.base_dir().join(&stored.public_id).exists());

        let outcome = store.delete(&stored.url).await.unwrap();
        assert!(outcome.deleted);
        assert_eq!(outcome.message, "ok");

        let again = store.delete(&stored.public_id).await.unwrap();
        assert!(again.deleted);
        assert_eq!(again.message, "not found");

        let _ = std::fs::remove_dir_all(store.base_dir());
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let store = temp_store();
        let result = store.upload("albums", "big.png", &[0u8; 17]).await;
        assert!(matches!(result, Err(StorageError::InvalidFileSize { max_bytes: 16 })));
    }
}
