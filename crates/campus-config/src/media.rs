use std::env;
use std::path::PathBuf;

/// Where uploaded images are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaBackend {
    Local,
    Cloudinary,
}

#[derive(Clone, Debug)]
pub struct MediaConfig {
    pub backend: MediaBackend,
    pub cloudinary_cloud_name: String,
    pub cloudinary_api_key: String,
    pub cloudinary_api_secret: String,
    pub upload_dir: PathBuf,
    pub upload_base_url: String,
    pub max_upload_bytes: usize,
}

impl MediaConfig {
    pub fn from_env() -> Self {
        let backend = match env::var("MEDIA_BACKEND")
            .unwrap_or_default()
            .trim()
            .to_lowercase()
            .as_str()
        {
            "cloudinary" => MediaBackend::Cloudinary,
            _ => MediaBackend::Local,
        };

        Self {
            backend,
            cloudinary_cloud_name: env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
            cloudinary_api_key: env::var("CLOUDINARY_API_KEY").unwrap_or_default(),
            cloudinary_api_secret: env::var("CLOUDINARY_API_SECRET").unwrap_or_default(),
            upload_dir: PathBuf::from(
                env::var("UPLOAD_DIR").unwrap_or_else(|_| "storage/uploads".to_string()),
            ),
            upload_base_url: env::var("UPLOAD_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/uploads".to_string()),
            max_upload_bytes: env::var("UPLOAD_MAX_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5 * 1024 * 1024),
        }
    }
}
