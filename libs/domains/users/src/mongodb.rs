//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::{
    bson::{self, doc},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;
use crate::repository::UserRepository;

pub const USERS_COLLECTION: &str = "users";

const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Serialize, Deserialize)]
struct UserDocument {
    #[serde(rename = "_id")]
    id: bson::Uuid,
    email: String,
    name: String,
    #[serde(rename = "passwordHash")]
    password_hash: String,
    #[serde(rename = "createdAt")]
    created_at: bson::DateTime,
    #[serde(rename = "updatedAt")]
    updated_at: bson::DateTime,
}

fn from_bson_date(at: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(at.timestamp_millis()).unwrap_or_default()
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: bson::Uuid::from_bytes(user.id.into_bytes()),
            email: user.email.clone(),
            name: user.name.clone(),
            password_hash: user.password_hash.clone(),
            created_at: bson::DateTime::from_millis(user.created_at.timestamp_millis()),
            updated_at: bson::DateTime::from_millis(user.updated_at.timestamp_millis()),
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: Uuid::from_bytes(doc.id.bytes()),
            email: doc.email,
            name: doc.name,
            password_hash: doc.password_hash,
            created_at: from_bson_date(doc.created_at),
            updated_at: from_bson_date(doc.updated_at),
        }
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

/// MongoDB-backed [`UserRepository`].
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<UserDocument>(USERS_COLLECTION),
        }
    }

    /// Unique index on `email`; duplicate registrations surface as `DuplicateEmail`.
    pub async fn init_indexes(&self) -> UserResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("idx_email_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> UserResult<User> {
        let document = UserDocument::from(&user);
        match self.collection.insert_one(&document).await {
            Ok(_) => {
                tracing::info!("Created user");
                Ok(user)
            }
            Err(err) if is_duplicate_key(&err) => Err(UserError::DuplicateEmail(user.email)),
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let found = self
            .collection
            .find_one(doc! { "_id": bson::Uuid::from_bytes(id.into_bytes()) })
            .await?;
        Ok(found.map(User::from))
    }

    #[instrument(skip(self, email))]
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let found = self.collection.find_one(doc! { "email": email }).await?;
        Ok(found.map(User::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_uses_camel_case_hash_field() {
        let user = User::new("ada@example.test".into(), "Ada".into(), "$argon2id$v=19$...".into());
        let document = bson::to_document(&UserDocument::from(&user)).unwrap();

        assert_eq!(document.get_str("passwordHash").unwrap(), "$argon2id$v=19$...");
        assert!(document.get("createdAt").is_some());
    }

    #[test]
    fn test_document_round_trip() {
        let user = User::new("ada@example.test".into(), "Ada".into(), "hash".into());
        let back = User::from(UserDocument::from(&user));
        assert_eq!(back.id, user.id);
        assert_eq!(back.email, user.email);
        assert_eq!(back.password_hash, user.password_hash);
    }
}
