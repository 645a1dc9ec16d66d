use async_trait::async_trait;
use chrono::Utc;
use core_config::{env_required, ConfigError, FromEnv};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::instrument;

use super::{ImageStore, ImageUpload, StoredImage};
use crate::error::{ProductError, ProductResult};

/// Cloudinary account credentials.
///
/// Environment variables: `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`,
/// `CLOUDINARY_API_SECRET` (all required).
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

impl FromEnv for CloudinaryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cloud_name: env_required("CLOUDINARY_CLOUD_NAME")?,
            api_key: env_required("CLOUDINARY_API_KEY")?,
            api_secret: env_required("CLOUDINARY_API_SECRET")?,
        })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Signed uploads to the Cloudinary image upload API.
#[derive(Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: CloudinaryConfig,
    endpoint: String,
}

impl CloudinaryStore {
    pub fn new(config: CloudinaryConfig) -> Self {
        let endpoint = format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            config.cloud_name
        );
        Self {
            client: reqwest::Client::new(),
            config,
            endpoint,
        }
    }

    /// Points uploads at a different base URL (e.g. a local stub server).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Hex SHA-256 of the `&`-joined, key-sorted params followed by the secret.
    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut sorted = params.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));
        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let digest = Sha256::digest(format!("{to_sign}{}", self.config.api_secret).as_bytes());
        const_hex::encode(digest)
    }
}

/// Turns a non-2xx response into the host's own error message.
fn upload_error(status: reqwest::StatusCode, body: &str) -> ProductError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| format!("Image upload failed with status {status}"));
    ProductError::Storage(message)
}

#[async_trait]
impl ImageStore for CloudinaryStore {
    #[instrument(skip(self, image), fields(file_name = %image.file_name, size = image.bytes.len()))]
    async fn upload(&self, image: ImageUpload, folder: &str) -> ProductResult<StoredImage> {
        let timestamp = Utc::now().timestamp().to_string();
        let signature = self.sign(&[("folder", folder), ("timestamp", &timestamp)]);

        let mut part = Part::bytes(image.bytes.to_vec()).file_name(image.file_name);
        if let Some(content_type) = image.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| ProductError::Payload(format!("Invalid image content type: {e}")))?;
        }

        let form = Form::new()
            .part("file", part)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", folder.to_string())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ProductError::Storage(format!("Image upload failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = upload_error(status, &body);
            tracing::error!(%status, "Image upload rejected: {}", err);
            return Err(err);
        }

        let stored: StoredImage = response
            .json()
            .await
            .map_err(|e| ProductError::Storage(format!("Unreadable upload response: {e}")))?;

        tracing::info!(public_id = %stored.public_id, "Image uploaded");
        Ok(stored)
    }
}
