//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::{FindOptions, IndexOptions},
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{ProductError, ProductResult};
use crate::models::{NewProduct, Product, ProductFilter};
use crate::repository::ProductRepository;

pub const PRODUCTS_COLLECTION: &str = "products";

/// Stored shape: binary UUID id and BSON dates so sorting is by instant.
#[derive(Debug, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: bson::Uuid,
    name: String,
    #[serde(default)]
    description: String,
    price: f64,
    #[serde(default)]
    image: String,
    #[serde(rename = "createdAt")]
    created_at: bson::DateTime,
    #[serde(rename = "updatedAt")]
    updated_at: bson::DateTime,
}

fn to_bson_uuid(id: Uuid) -> bson::Uuid {
    bson::Uuid::from_bytes(id.into_bytes())
}

fn to_bson_date(at: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(at.timestamp_millis())
}

fn from_bson_date(at: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

impl From<&Product> for ProductDocument {
    fn from(product: &Product) -> Self {
        Self {
            id: to_bson_uuid(product.id),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            image: product.image.clone(),
            created_at: to_bson_date(product.created_at),
            updated_at: to_bson_date(product.updated_at),
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(doc: ProductDocument) -> Self {
        Self {
            id: Uuid::from_bytes(doc.id.bytes()),
            name: doc.name,
            description: doc.description,
            price: doc.price,
            image: doc.image,
            created_at: from_bson_date(doc.created_at),
            updated_at: from_bson_date(doc.updated_at),
        }
    }
}

/// MongoDB-backed [`ProductRepository`].
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<ProductDocument>,
}

impl MongoProductRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, PRODUCTS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<ProductDocument>(collection_name),
        }
    }

    /// Indexes for the default sort, the price range and name lookups.
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "createdAt": -1, "_id": -1 })
                .options(IndexOptions::builder().name("idx_created_at".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "price": 1 })
                .options(IndexOptions::builder().name("idx_price".to_string()).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(IndexOptions::builder().name("idx_name".to_string()).build())
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("Product indexes created successfully");
        Ok(())
    }

    /// Price bounds always apply; the name regex only for a non-empty search.
    /// Search text is escaped so it matches literally.
    fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {
            "price": { "$gte": filter.min_price, "$lte": filter.max_price },
        };

        if !filter.search.is_empty() {
            doc.insert(
                "name",
                doc! { "$regex": regex::escape(&filter.search), "$options": "i" },
            );
        }

        doc
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": to_bson_uuid(id) }
    }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self, input), fields(product_name = %input.fields.name))]
    async fn create(&self, input: NewProduct) -> ProductResult<Product> {
        let document = ProductDocument::from(&Product::new(input));
        self.collection.insert_one(&document).await?;

        let product = Product::from(document);
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ProductResult<Option<Product>> {
        let found = self.collection.find_one(Self::id_filter(id)).await?;
        Ok(found.map(Product::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, filter: &ProductFilter, skip: u64, limit: u64) -> ProductResult<Vec<Product>> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1, "_id": -1 })
            // The driver sends skip and limit as int64.
            .skip(skip.min(i64::MAX as u64))
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let cursor = self
            .collection
            .find(Self::build_filter(filter))
            .with_options(options)
            .await?;
        let documents: Vec<ProductDocument> = cursor.try_collect().await?;

        Ok(documents.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64> {
        let total = self.collection.count_documents(Self::build_filter(filter)).await?;
        Ok(total)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn update(&self, product: Product) -> ProductResult<Product> {
        let document = ProductDocument::from(&product);
        let result = self
            .collection
            .replace_one(Self::id_filter(product.id), &document)
            .await?;

        if result.matched_count == 0 {
            return Err(ProductError::NotFound(product.id));
        }

        tracing::info!("Product updated");
        Ok(Product::from(document))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ProductResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;
        Ok(result.deleted_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_without_search() {
        let filter = MongoProductRepository::build_filter(&ProductFilter::default());
        assert!(filter.get("name").is_none());
        let price = filter.get_document("price").unwrap();
        assert_eq!(price.get_f64("$gte").unwrap(), 0.0);
        assert_eq!(price.get_f64("$lte").unwrap(), 1_000_000_000.0);
    }

    #[test]
    fn test_build_filter_escapes_search() {
        let filter = MongoProductRepository::build_filter(&ProductFilter {
            search: "a.b(c)".into(),
            ..ProductFilter::default()
        });
        let name = filter.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), r"a\.b\(c\)");
        assert_eq!(name.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_document_round_trip_keeps_millis() {
        let product = Product::new(NewProduct {
            fields: crate::models::ProductFields {
                name: "Lamp".into(),
                description: "Warm".into(),
                price: 12.5,
            },
            image: String::new(),
        });

        let back = Product::from(ProductDocument::from(&product));
        assert_eq!(back.id, product.id);
        assert_eq!(back.created_at.timestamp_millis(), product.created_at.timestamp_millis());
    }
}
