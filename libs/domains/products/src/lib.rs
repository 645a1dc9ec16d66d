//! Products Domain
//!
//! The product catalog: listing with search, price range and pagination,
//! detail, and create/update/delete from multipart forms with an optional
//! image pushed to a hosted image store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, multipart decoding
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌─────────────┐
//! │   Service   │ ──▶ │ ImageStore  │  ← Cloudinary / in-memory
//! └──────┬──────┘     └─────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB + in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, query and form types
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_products::{
//!     handlers,
//!     images::InMemoryImageStore,
//!     mongodb::MongoProductRepository,
//!     service::ProductService,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("catalog");
//!
//! let repository = MongoProductRepository::new(&db);
//! repository.init_indexes().await?;
//! let service = ProductService::new(repository, Arc::new(InMemoryImageStore::new()));
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod images;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod upload;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use handlers::ApiDoc;
pub use images::{
    CloudinaryConfig, CloudinaryStore, ImageStore, ImageUpload, InMemoryImageStore, StoredImage,
};
pub use models::{
    DeletedProduct, NewProduct, Product, ProductFields, ProductFilter, ProductListQuery,
    ProductPage,
};
pub use mongodb::MongoProductRepository;
pub use repository::{InMemoryProductRepository, ProductRepository};
pub use service::ProductService;
pub use upload::UploadLimits;
