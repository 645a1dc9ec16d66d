//! Product Service - orchestrates validation, image upload and persistence

use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::images::{ImageStore, ImageUpload, PRODUCT_IMAGE_FOLDER};
use crate::models::{NewProduct, Product, ProductFields, ProductListQuery, ProductPage};
use crate::repository::ProductRepository;
use crate::upload::UploadLimits;

/// Catalog operations.
///
/// Create and update validate first, upload the image (if any) second and
/// write the record last. There is no rollback: when the write fails after
/// a successful upload the stored image is left orphaned.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    images: Arc<dyn ImageStore>,
    limits: UploadLimits,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            images: Arc::clone(&self.images),
            limits: self.limits,
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R, images: Arc<dyn ImageStore>) -> Self {
        Self {
            repository: Arc::new(repository),
            images,
            limits: UploadLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: UploadLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn upload_limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// One page of matching products and the total match count, fetched
    /// concurrently from the same filter.
    #[instrument(skip(self), fields(page = query.page, limit = query.limit))]
    pub async fn list_products(&self, query: &ProductListQuery) -> ProductResult<ProductPage> {
        query.validate()?;

        let filter = query.filter();
        let (products, total) = tokio::try_join!(
            self.repository.list(&filter, query.skip(), query.limit),
            self.repository.count(&filter),
        )?;

        tracing::debug!(returned = products.len(), total, "Listed products");
        Ok(ProductPage { products, total })
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self, input, image), fields(product_name = %input.name, has_image = image.is_some()))]
    pub async fn create_product(
        &self,
        input: ProductFields,
        image: Option<ImageUpload>,
    ) -> ProductResult<Product> {
        input.validate()?;

        let image = self.store_image(image).await?.unwrap_or_default();
        let product = self
            .repository
            .create(NewProduct {
                fields: input,
                image,
            })
            .await?;

        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, input, image), fields(has_image = image.is_some()))]
    pub async fn update_product(
        &self,
        id: Uuid,
        input: ProductFields,
        image: Option<ImageUpload>,
    ) -> ProductResult<Product> {
        input.validate()?;

        let mut product = self.get_product(id).await?;
        let image = self.store_image(image).await?;
        product.apply(input, image);

        self.repository.update(product).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: Uuid) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        tracing::info!("Product deleted");
        Ok(())
    }

    async fn store_image(&self, image: Option<ImageUpload>) -> ProductResult<Option<String>> {
        let Some(image) = image else {
            return Ok(None);
        };

        let stored = self.images.upload(image, PRODUCT_IMAGE_FOLDER).await?;
        Ok(Some(stored.secure_url))
    }
}
