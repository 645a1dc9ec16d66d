use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user; fails with `DuplicateEmail` when the email is taken
    async fn create(&self, user: User) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    /// Exact, case-sensitive email lookup
    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());
        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(User::new("ada@example.test".into(), "Ada".into(), "h".into()))
            .await
            .unwrap();

        let err = repo
            .create(User::new("ada@example.test".into(), "Other".into(), "h".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .create(User::new("ada@example.test".into(), "Ada".into(), "h".into()))
            .await
            .unwrap();

        assert_eq!(repo.get_by_email("ada@example.test").await.unwrap(), Some(user.clone()));
        assert_eq!(repo.get_by_email("ADA@example.test").await.unwrap(), None);
        assert_eq!(repo.get_by_id(user.id).await.unwrap(), Some(user));
    }
}
