//! Multipart decoding for product create/update forms.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::BytesMut;
use core_config::{env_parse, ConfigError, FromEnv};

use crate::error::{ProductError, ProductResult};
use crate::images::ImageUpload;
use crate::models::ProductFields;

/// Default ceiling for a single uploaded file: 10 MiB.
pub const DEFAULT_MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Headroom on top of the file ceiling for text fields and multipart framing.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Name of the only field allowed to carry a file.
pub const IMAGE_FIELD: &str = "image";

/// Size and count ceilings for uploaded files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    pub max_file_bytes: usize,
    pub max_files: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            max_files: 1,
        }
    }
}

impl UploadLimits {
    /// Request body limit for routes that accept product forms.
    pub fn body_limit(&self) -> usize {
        self.max_file_bytes
            .saturating_mul(self.max_files)
            .saturating_add(FORM_OVERHEAD_BYTES)
    }
}

/// `UPLOAD_MAX_FILE_BYTES` (default 10485760).
impl FromEnv for UploadLimits {
    fn from_env() -> Result<Self, ConfigError> {
        let max_file_bytes = env_parse("UPLOAD_MAX_FILE_BYTES", DEFAULT_MAX_FILE_BYTES)?;
        if max_file_bytes == 0 {
            return Err(ConfigError::ParseError {
                key: "UPLOAD_MAX_FILE_BYTES".to_string(),
                details: "must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            max_file_bytes,
            ..Self::default()
        })
    }
}

/// Raw text fields and the optional file of a product form.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub image: Option<ImageUpload>,
}

impl ProductForm {
    /// Coerces the text fields into validated [`ProductFields`].
    pub fn into_parts(self) -> ProductResult<(ProductFields, Option<ImageUpload>)> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ProductError::Validation("name is required".to_string()))?;

        let price = parse_price(self.price.as_deref())?;

        let fields = ProductFields {
            name,
            description: self.description.unwrap_or_default(),
            price,
        };

        Ok((fields, self.image))
    }
}

/// Parses a decimal price; rejects missing, non-numeric, non-finite and negative values.
pub fn parse_price(raw: Option<&str>) -> ProductResult<f64> {
    let raw = raw
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ProductError::Validation("price is required".to_string()))?;

    let price: f64 = raw
        .parse()
        .map_err(|_| ProductError::Validation(format!("price must be a number, got '{raw}'")))?;

    if !price.is_finite() {
        return Err(ProductError::Validation("price must be a finite number".to_string()));
    }
    if price < 0.0 {
        return Err(ProductError::Validation("price must not be negative".to_string()));
    }

    Ok(price)
}

fn multipart_error(err: MultipartError) -> ProductError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ProductError::PayloadTooLarge(err.body_text())
    } else {
        ProductError::Payload(err.body_text())
    }
}

async fn read_file(mut field: Field<'_>, limits: &UploadLimits) -> ProductResult<BytesMut> {
    let mut bytes = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if bytes.len() + chunk.len() > limits.max_file_bytes {
            return Err(ProductError::PayloadTooLarge(format!(
                "Image exceeds the {} byte limit",
                limits.max_file_bytes
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Reads a product form, enforcing the file ceilings.
///
/// Text fields other than `name`, `description` and `price` are ignored; the
/// first occurrence of each wins. A file part with no file name and no
/// content counts as "no file chosen".
pub async fn decode_product_form(
    mut multipart: Multipart,
    limits: &UploadLimits,
) -> ProductResult<ProductForm> {
    let mut form = ProductForm::default();
    let mut files = 0usize;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            if field_name != IMAGE_FIELD {
                return Err(ProductError::Payload(format!(
                    "Unexpected file field '{field_name}'; only '{IMAGE_FIELD}' accepts a file"
                )));
            }

            let content_type = field.content_type().map(str::to_string);
            let bytes = read_file(field, limits).await?;

            if bytes.is_empty() {
                if file_name.is_empty() {
                    continue;
                }
                return Err(ProductError::Payload(format!("Uploaded file '{file_name}' is empty")));
            }

            files += 1;
            if files > limits.max_files {
                return Err(ProductError::Payload(format!(
                    "At most {} file may be uploaded",
                    limits.max_files
                )));
            }

            form.image = Some(ImageUpload {
                file_name,
                content_type,
                bytes: bytes.freeze(),
            });
            continue;
        }

        let slot = match field_name.as_str() {
            "name" => &mut form.name,
            "description" => &mut form.description,
            "price" => &mut form.price,
            _ => continue,
        };
        let text = field.text().await.map_err(multipart_error)?;
        if slot.is_none() {
            *slot = Some(text);
        }
    }

    Ok(form)
}
