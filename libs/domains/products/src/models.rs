use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const DEFAULT_MIN_PRICE: f64 = 0.0;
pub const DEFAULT_MAX_PRICE: f64 = 1_000_000_000.0;
pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 8;
pub const MAX_LIMIT: u64 = 100;

/// Product entity as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier, assigned on creation
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    /// Product name (1-200 characters)
    pub name: String,
    /// Free-form description, may be empty
    #[serde(default)]
    pub description: String,
    /// Non-negative price
    pub price: f64,
    /// Hosted image URL, or empty when the product has no image
    #[serde(default)]
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a new record with a fresh id and timestamps.
    pub fn new(input: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: input.fields.name,
            description: input.fields.description,
            price: input.fields.price,
            image: input.image,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces name, description and price; the image only when a new one
    /// was stored.
    pub fn apply(&mut self, fields: ProductFields, image: Option<String>) {
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        if let Some(image) = image {
            self.image = image;
        }
        self.updated_at = Utc::now();
    }
}

/// The editable fields of a product, decoded from a form submission.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct ProductFields {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: String,
    #[validate(custom(function = "finite_non_negative"))]
    pub price: f64,
}

fn finite_non_negative(value: f64) -> Result<(), ValidationError> {
    finite(value)?;
    if value < 0.0 {
        let mut error = ValidationError::new("range");
        error.message = Some("must not be negative".into());
        return Err(error);
    }
    Ok(())
}

fn finite(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        let mut error = ValidationError::new("finite");
        error.message = Some("must be a finite number".into());
        return Err(error);
    }
    Ok(())
}

/// Input to [`ProductRepository::create`](crate::repository::ProductRepository::create).
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub fields: ProductFields,
    /// Stored image URL or `""`
    pub image: String,
}

/// Name-substring and inclusive price-range predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    pub search: String,
    pub min_price: f64,
    pub max_price: f64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            min_price: DEFAULT_MIN_PRICE,
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

impl ProductFilter {
    /// Case-insensitive, literal match used by the in-memory store.
    pub fn matches(&self, product: &Product) -> bool {
        let in_range = product.price >= self.min_price && product.price <= self.max_price;
        in_range
            && (self.search.is_empty()
                || product
                    .name
                    .to_lowercase()
                    .contains(&self.search.to_lowercase()))
    }
}

/// Query parameters for listing products.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Case-insensitive substring of the product name
    #[serde(default)]
    pub search: String,
    /// Inclusive lower price bound
    #[serde(default = "default_min")]
    #[validate(custom(function = "finite"))]
    #[param(default = 0.0)]
    pub min: f64,
    /// Inclusive upper price bound
    #[serde(default = "default_max")]
    #[validate(custom(function = "finite"))]
    #[param(default = 1_000_000_000.0)]
    pub max: f64,
    /// 1-based page number
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    #[param(default = 1, minimum = 1)]
    pub page: u64,
    /// Page size, at most 100
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = MAX_LIMIT))]
    #[param(default = 8, minimum = 1, maximum = 100)]
    pub limit: u64,
}

fn default_min() -> f64 {
    DEFAULT_MIN_PRICE
}

fn default_max() -> f64 {
    DEFAULT_MAX_PRICE
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Default for ProductListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            min: DEFAULT_MIN_PRICE,
            max: DEFAULT_MAX_PRICE,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ProductListQuery {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            search: self.search.clone(),
            min_price: self.min,
            max_price: self.max,
        }
    }

    /// Records to skip: `(page - 1) * limit`.
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// One page of products plus the total match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Count of all matches, independent of page and limit
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeletedProduct {
    pub id: Uuid,
    pub deleted: bool,
}

/// Multipart body accepted by create and update (documentation only).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ProductMultipart {
    /// Product name
    name: String,
    /// Product description
    description: Option<String>,
    /// Decimal price, e.g. `19.99`
    price: String,
    /// Optional image file (single file, size-capped)
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
}
