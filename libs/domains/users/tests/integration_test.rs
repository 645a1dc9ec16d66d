//! Integration tests for the Users domain against a real MongoDB
//!
//! Run with `cargo test -p domain_users -- --ignored` (requires Docker).

use domain_users::*;
use test_utils::{TestDataBuilder, TestMongo};

#[tokio::test]
#[ignore] // Requires Docker
async fn test_unique_email_and_exact_lookup() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_users_unique");
    let repo = MongoUserRepository::new(&mongo.database(&builder.database_name()));
    repo.init_indexes().await.unwrap();

    let email = builder.email("ada");
    let user = repo
        .create(User::new(email.clone(), "Ada".into(), "hash".into()))
        .await
        .unwrap();

    let duplicate = repo
        .create(User::new(email.clone(), "Other".into(), "hash".into()))
        .await;
    assert!(matches!(duplicate, Err(UserError::DuplicateEmail(_))));

    let found = repo.get_by_email(&email).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.password_hash, "hash");
    assert!(repo.get_by_email(&email.to_uppercase()).await.unwrap().is_none());
    assert!(repo.get_by_id(user.id).await.unwrap().is_some());
}

#[tokio::test]
#[ignore] // Requires Docker
async fn test_register_and_authorize_over_mongo() {
    let mongo = TestMongo::new().await;
    let builder = TestDataBuilder::from_test_name("mongo_users_authorize");
    let repo = MongoUserRepository::new(&mongo.database(&builder.database_name()));
    repo.init_indexes().await.unwrap();
    let service = UserService::new(repo);

    let email = builder.email("ada");
    let registered = service
        .register(RegisterRequest {
            email: email.clone(),
            name: "Ada".into(),
            password: "correct horse".into(),
        })
        .await
        .unwrap();

    let identity = service.authorize(&email, "correct horse").await.unwrap();
    assert_eq!(identity, registered);
    assert!(matches!(
        service.authorize(&email, "nope nope").await,
        Err(UserError::WrongPassword)
    ));
}
