use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::{ImageStore, ImageUpload, StoredImage};
use crate::error::{ProductError, ProductResult};

/// Keeps uploads in memory and hands back deterministic URLs.
///
/// Used by handler tests and local runs without image-host credentials.
#[derive(Clone, Default)]
pub struct InMemoryImageStore {
    uploads: Arc<Mutex<Vec<(String, ImageUpload)>>>,
    failure: Option<String>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every upload fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// `(folder, upload)` pairs in upload order.
    pub fn uploads(&self) -> Vec<(String, ImageUpload)> {
        self.uploads
            .lock()
            .map(|uploads| uploads.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn upload(&self, image: ImageUpload, folder: &str) -> ProductResult<StoredImage> {
        if let Some(message) = &self.failure {
            return Err(ProductError::Storage(message.clone()));
        }

        let mut uploads = self
            .uploads
            .lock()
            .map_err(|_| ProductError::Storage("image store lock poisoned".to_string()))?;

        let public_id = format!("{folder}/{}-{}", uploads.len() + 1, image.file_name);
        let stored = StoredImage {
            secure_url: format!("https://images.local/{public_id}"),
            public_id,
        };
        uploads.push((folder.to_string(), image));
        Ok(stored)
    }
}
