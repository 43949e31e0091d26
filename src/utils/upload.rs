//! Multipart form handling for endpoints that accept an image alongside
//! text fields.
//!
//! Text parts are collected into a JSON object and deserialized into the
//! same validated DTOs the JSON endpoints use; file parts are checked
//! against the allowed image types and the configured size cap.

use std::collections::HashMap;

use anyhow::anyhow;
use axum::body::Bytes;
use axum::extract::Multipart;
use campus_core::AppError;
use campus_core::media::{MediaStore, StoredMedia, validate_image};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::metrics::track_media_operation;
use crate::validator::{payload_error, validate_dto};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    fields: Map<String, Value>,
    files: HashMap<String, UploadedFile>,
}

impl UploadForm {
    pub async fn from_multipart(multipart: &mut Multipart, max_bytes: usize) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(anyhow!("Invalid multipart body: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::bad_request(anyhow!("Failed to read file: {}", e)))?;

                    // Browsers send an empty part when no file was picked.
                    if bytes.is_empty() && file_name.is_empty() {
                        continue;
                    }

                    validate_image(&content_type, bytes.len(), max_bytes)
                        .map_err(|e| e.into_app_error())?;

                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| AppError::bad_request(anyhow!("Invalid form field: {}", e)))?;
                    form.fields.insert(name, Value::String(text));
                }
            }
        }

        Ok(form)
    }

    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
            files: HashMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    pub fn require_file(&mut self, name: &str) -> Result<UploadedFile, AppError> {
        self.take_file(name)
            .ok_or_else(|| AppError::bad_request(anyhow!("{} file is required", name)))
    }

    /// Deserialize the text fields into `T` and run its validation rules.
    pub fn parse<T>(&self) -> Result<T, AppError>
    where
        T: DeserializeOwned + Validate,
    {
        let dto: T = serde_json::from_value(Value::Object(self.fields.clone()))
            .map_err(|e| payload_error(&e.to_string()))?;
        validate_dto(&dto)?;
        Ok(dto)
    }
}

/// Hand a validated upload to the media store.
pub async fn store_file(
    store: &dyn MediaStore,
    folder: &str,
    file: &UploadedFile,
) -> Result<StoredMedia, AppError> {
    let result = store.upload(folder, &file.file_name, &file.bytes).await;
    track_media_operation("upload", result.is_ok());
    result.map_err(|e| e.into_app_error())
}

/// Delete a hosted file without failing the caller. Prefers the stored
/// public id and falls back to the URL. Returns a warning when the host
/// refused or could not be reached.
pub async fn discard_media(
    store: &dyn MediaStore,
    public_id: Option<&str>,
    url: &str,
) -> Option<String> {
    let reference = public_id.filter(|id| !id.is_empty()).unwrap_or(url);
    if reference.is_empty() {
        return None;
    }

    let warning = match store.delete(reference).await {
        Ok(outcome) if outcome.deleted => None,
        Ok(outcome) => Some(format!(
            "Image host did not delete {}: {}",
            reference, outcome.message
        )),
        Err(e) => Some(format!("Failed to delete {} from image host: {}", reference, e)),
    };

    track_media_operation("delete", warning.is_none());
    if let Some(message) = &warning {
        tracing::warn!(reference = %reference, "{}", message);
    }
    warning
}
