//! Cloudinary image host.
//!
//! Uses the signed REST upload API: the request parameters (except the
//! file, api key and the signature itself) are sorted, joined as
//! `k=v&k=v`, suffixed with the API secret and hashed with SHA-256.

use std::fmt;

use campus_core::media::{BoxFuture, DeleteOutcome, MediaStore, StorageError, StoredMedia};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use sha2::{Digest, Sha256};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Clone)]
pub struct CloudinaryStore {
    client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    max_file_size: usize,
}

impl fmt::Debug for CloudinaryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryStore")
            .field("cloud_name", &self.cloud_name)
            .field("max_file_size", &self.max_file_size)
            .finish_non_exhaustive()
    }
}

impl CloudinaryStore {
    pub fn new(
        client: Client,
        cloud_name: String,
        api_key: String,
        api_secret: String,
        max_file_size: usize,
    ) -> Self {
        Self {
            client,
            cloud_name,
            api_key,
            api_secret,
            max_file_size,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", API_BASE, self.cloud_name, action)
    }

    fn signed_form(&self, params: &[(&str, String)]) -> Form {
        let signature = sign(params, &self.api_secret);
        let mut form = Form::new();
        for (key, value) in params {
            form = form.text(key.to_string(), value.clone());
        }
        form.text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256")
    }

    async fn post(&self, action: &str, form: Form) -> Result<Value, StorageError> {
        let response = self
            .client
            .post(self.endpoint(action))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::Upstream(e.to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| StorageError::Upstream(e.to_string()))?;

        if !status.is_success() {
            let message = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("request failed");
            return Err(StorageError::Upstream(format!("{} ({})", message, status)));
        }

        Ok(body)
    }
}

/// Request signature: sorted `k=v` pairs joined with `&`, secret appended,
/// hex SHA-256.
pub fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Reduce a delivery URL to the asset's public id.
///
/// `https://res.cloudinary.com/demo/image/upload/v1712345678/teachers/abc.jpg`
/// becomes `teachers/abc`. Anything that is not a URL is returned as-is.
pub fn public_id_from_url(reference: &str) -> String {
    let reference = reference.trim();
    if !reference.contains("://") {
        return reference.to_string();
    }

    let path = reference.split(['?', '#']).next().unwrap_or(reference);
    let tail = match path.split_once("/upload/") {
        Some((_, rest)) => rest,
        None => path.rsplit('/').next().unwrap_or(path),
    };

    let mut segments: Vec<&str> = tail.split('/').filter(|s| !s.is_empty()).collect();
    if let Some(pos) = segments.iter().position(|s| is_version_segment(s)) {
        segments.drain(..=pos);
    }

    if let Some(last) = segments.last_mut() {
        let current: &str = *last;
        if let Some((stem, _)) = current.rsplit_once('.') {
            *last = stem;
        }
    }

    segments.join("/")
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

impl MediaStore for CloudinaryStore {
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

            let params = [
                ("folder", folder.trim_matches('/').to_string()),
                ("timestamp", chrono::Utc::now().timestamp().to_string()),
            ];
            let part = Part::bytes(content.to_vec()).file_name(file_name.to_string());
            let form = self.signed_form(&params).part("file", part);

            let body = self.post("upload", form).await?;
            let url = body
                .get("secure_url")
                .and_then(Value::as_str)
                .ok_or_else(|| StorageError::Upstream("upload response has no secure_url".into()))?;
            let public_id = body
                .get("public_id")
                .and_then(Value::as_str)
                .ok_or_else(|| StorageError::Upstream("upload response has no public_id".into()))?;

            tracing::debug!(public_id = %public_id, bytes = content.len(), "Uploaded to Cloudinary");

            Ok(StoredMedia {
                url: url.to_string(),
                public_id: public_id.to_string(),
            })
        })
    }

    fn delete<'a>(&'a self, reference: &'a str) -> BoxFuture<'a, Result<DeleteOutcome, StorageError>> {
        Box::pin(async move {
            let public_id = public_id_from_url(reference);
            if public_id.is_empty() {
                return Err(StorageError::InvalidKey("empty public id".to_string()));
            }

            let params = [
                ("public_id", public_id),
                ("timestamp", chrono::Utc::now().timestamp().to_string()),
            ];
            let body = self.post("destroy", self.signed_form(&params)).await?;
            let result = body
                .get("result")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            Ok(DeleteOutcome {
                deleted: result == "ok" || result == "not found",
                message: result,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_id_from_versioned_url() {
        assert_eq!(
            public_id_from_url(
                "https://res.cloudinary.com/demo/image/upload/v1712345678/teachers/abc123.jpg"
            ),
            "teachers/abc123"
        );
    }

    #[test]
    fn test_public_id_from_url_without_folder_or_version() {
        assert_eq!(
            public_id_from_url("https://res.cloudinary.com/demo/image/upload/sample.png?x=1"),
            "sample"
        );
        assert_eq!(
            public_id_from_url("https://res.cloudinary.com/demo/image/upload/v1/sample.webp"),
            "sample"
        );
    }

    #[test]
    fn test_public_id_passthrough() {
        assert_eq!(public_id_from_url("albums/cover_1"), "albums/cover_1");
    }

    #[test]
    fn test_sign_sorts_parameters() {
        let a = sign(
            &[
                ("timestamp", "1315060510".to_string()),
                ("folder", "teachers".to_string()),
            ],
            "secret",
        );
        let b = sign(
            &[
                ("folder", "teachers".to_string()),
                ("timestamp", "1315060510".to_string()),
            ],
            "secret",
        );
        assert_eq!(a, b);

        let mut hasher = Sha256::new();
        hasher.update(b"folder=teachers&timestamp=1315060510secret");
        assert_eq!(a, hex::encode(hasher.finalize()));
    }

    #[test]
    fn test_sign_skips_empty_values() {
        let with_empty = sign(
            &[("folder", String::new()), ("timestamp", "1".to_string())],
            "s",
        );
        let without = sign(&[("timestamp", "1".to_string())], "s");
        assert_eq!(with_empty, without);
    }

    #[test]
    fn test_endpoint() {
        let store = CloudinaryStore::new(
            Client::new(),
            "demo".into(),
            "key".into(),
            "shh".into(),
            1024,
        );
        assert_eq!(
            store.endpoint("destroy"),
            "https://api.cloudinary.com/v1_1/demo/image/destroy"
        );
        assert!(!format!("{:?}", store).contains("shh"));
    }
}
