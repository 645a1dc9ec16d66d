//! Object storage for product images.

pub mod cloudinary;
pub mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;

use crate::error::ProductResult;

pub use cloudinary::{CloudinaryConfig, CloudinaryStore};
pub use memory::InMemoryImageStore;

/// Folder every product image is stored under.
pub const PRODUCT_IMAGE_FOLDER: &str = "products";

/// A decoded file part, held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Where an uploaded image ended up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredImage {
    /// Durable public HTTPS URL
    pub secure_url: String,
    pub public_id: String,
}

/// Uploads files to a durable host and returns their public URL.
///
/// A failed upload is reported as [`ProductError::Storage`](crate::ProductError::Storage);
/// implementations do not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, image: ImageUpload, folder: &str) -> ProductResult<StoredImage>;
}
