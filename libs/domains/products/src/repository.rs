use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product, ProductFilter};

/// Product persistence.
///
/// `list` and `count` take the same [`ProductFilter`] so a page and its total
/// always describe the same result set. Listing is ordered newest first
/// (`created_at` descending, ties broken by id descending).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product; the store assigns id and timestamps.
    async fn create(&self, input: NewProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>>;

    /// One page of matches after skipping `skip` records.
    async fn list(&self, filter: &ProductFilter, skip: u64, limit: u64) -> ProductResult<Vec<Product>>;

    /// Number of records matching `filter`, ignoring pagination.
    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64>;

    /// Replace the stored record with the same id.
    async fn update(&self, product: Product) -> ProductResult<Product>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: Uuid) -> ProductResult<bool>;
}

/// Process-local store for tests and local runs.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first(a: &Product, b: &Product) -> std::cmp::Ordering {
        b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let product = Product::new(input);
        self.products.write().await.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: &ProductFilter, skip: u64, limit: u64) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut matches: Vec<&Product> = products.values().filter(|p| filter.matches(p)).collect();
        matches.sort_by(|a, b| Self::newest_first(a, b));

        Ok(matches
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64> {
        let products = self.products.read().await;
        Ok(products.values().filter(|p| filter.matches(p)).count() as u64)
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;
        match products.get_mut(&product.id) {
            Some(slot) => {
                *slot = product.clone();
                Ok(product)
            }
            None => Err(ProductError::NotFound(product.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        Ok(self.products.write().await.remove(&id).is_some())
    }
}
