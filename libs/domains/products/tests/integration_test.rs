//! Integration tests for the Products domain
//!
//! These use a real MongoDB via testcontainers to check:
//! - The stored document shape reads back unchanged
//! - Search, price range, sort and pagination run server-side
//! - Update and delete report missing records
//!
//! Run with `cargo test -p domain_products -- --ignored` (requires Docker).

use domain_products::*;
use test_utils::{TestDataBuilder, TestMongo};
use uuid::Uuid;

async fn repository(mongo: &TestMongo, builder: &TestDataBuilder) -> MongoProductRepository {
    let repo = MongoProductRepository::new(&mongo.database(&builder.database_name()));
    repo.init_indexes().await.unwrap();
    repo
}

fn new_product(name: &str, price: f64) -> NewProduct {
    NewProduct {
        fields: ProductFields {
            name: name.to_string(),
            description: "integration".to_string(),
            price,
        },
        image: String::new(),
    }
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_create_and_get_product() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_create_and_get");
    let repo = repository(&mongo, &builder).await;

    let created = repo
        .create(NewProduct {
            image: "https://images.local/products/lamp.png".to_string(),
            ..new_product(&builder.product_name("Lamp"), 12.5)
        })
        .await
        .unwrap();

    let fetched = repo.get_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.name, created.name);
    assert_eq!(fetched.price, 12.5);
    assert_eq!(fetched.image, "https://images.local/products/lamp.png");
    assert_eq!(
        fetched.created_at.timestamp_millis(),
        created.created_at.timestamp_millis()
    );

    assert!(repo.get_by_id(Uuid::now_v7()).await.unwrap().is_none());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_list_paginates_newest_first() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_paginate");
    let repo = repository(&mongo, &builder).await;

    let mut created = Vec::new();
    for i in 0..10 {
        created.push(repo.create(new_product(&format!("Item {i}"), i as f64)).await.unwrap());
        // Distinct millisecond timestamps keep the sort deterministic
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let filter = ProductFilter::default();
    let first = repo.list(&filter, 0, 8).await.unwrap();
    assert_eq!(first.len(), 8);
    assert_eq!(first[0].id, created[9].id);

    let second = repo.list(&filter, 8, 8).await.unwrap();
    assert_eq!(second.len(), 2);
    assert_eq!(second[1].id, created[0].id);

    let past_end = repo.list(&filter, u64::MAX, 8).await.unwrap();
    assert!(past_end.is_empty());

    assert_eq!(repo.count(&filter).await.unwrap(), 10);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_search_is_case_insensitive_and_literal() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_search");
    let repo = repository(&mongo, &builder).await;

    repo.create(new_product("Red Chair", 40.0)).await.unwrap();
    repo.create(new_product("red table", 120.0)).await.unwrap();
    repo.create(new_product("C++ Primer", 30.0)).await.unwrap();
    repo.create(new_product("Cpp Primer", 30.0)).await.unwrap();

    let red_under_100 = ProductFilter {
        search: "RED".to_string(),
        min_price: 0.0,
        max_price: 100.0,
    };
    assert_eq!(repo.count(&red_under_100).await.unwrap(), 1);

    let literal = ProductFilter {
        search: "c++".to_string(),
        ..ProductFilter::default()
    };
    let found = repo.list(&literal, 0, 8).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "C++ Primer");

    let inverted = ProductFilter {
        min_price: 100.0,
        max_price: 10.0,
        ..ProductFilter::default()
    };
    assert_eq!(repo.count(&inverted).await.unwrap(), 0);
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_update_and_delete() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_update_delete");
    let repo = repository(&mongo, &builder).await;

    let mut product = repo.create(new_product("Lamp", 10.0)).await.unwrap();
    product.price = 11.0;
    product.image = "https://images.local/products/new.png".to_string();
    repo.update(product.clone()).await.unwrap();

    let fetched = repo.get_by_id(product.id).await.unwrap().unwrap();
    assert_eq!(fetched.price, 11.0);
    assert_eq!(fetched.image, "https://images.local/products/new.png");

    assert!(repo.delete(product.id).await.unwrap());
    assert!(!repo.delete(product.id).await.unwrap());
    assert!(matches!(
        repo.update(product).await,
        Err(ProductError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_service_over_mongo_with_in_memory_images() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_service");
    let repo = repository(&mongo, &builder).await;
    let service = ProductService::new(repo, std::sync::Arc::new(InMemoryImageStore::new()));

    let image = ImageUpload {
        file_name: "lamp.png".to_string(),
        content_type: Some("image/png".to_string()),
        bytes: bytes::Bytes::from_static(b"png"),
    };
    let created = service
        .create_product(new_product("Lamp", 10.0).fields, Some(image))
        .await
        .unwrap();
    assert_eq!(created.image, "https://images.local/products/1-lamp.png");

    let page = service
        .list_products(&ProductListQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.products[0].id, created.id);

    service.delete_product(created.id).await.unwrap();
    assert!(matches!(
        service.get_product(created.id).await,
        Err(ProductError::NotFound(_))
    ));
}
