use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{RegisterRequest, User, UserIdentity};
use crate::repository::UserRepository;

/// Credential checks and account creation.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create an account with an Argon2-hashed password
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: RegisterRequest) -> UserResult<UserIdentity> {
        input.validate()?;

        let password_hash = hash_password(&input.password)?;
        let user = User::new(input.email, input.name, password_hash);
        let created = self.repository.create(user).await?;

        tracing::info!(user_id = %created.id, "User registered");
        Ok(created.into())
    }

    /// Check an email/password pair.
    ///
    /// Both must be non-empty. The email must match exactly. An unknown email and a wrong password
    /// are reported separately.
    #[instrument(skip(self, email, password))]
    pub async fn authorize(&self, email: &str, password: &str) -> UserResult<UserIdentity> {
        if email.is_empty() || password.is_empty() {
            return Err(UserError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let user = self
            .repository
            .get_by_email(email)
            .await?
            .ok_or(UserError::UnknownEmail)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "Password rejected");
            return Err(UserError::WrongPassword);
        }

        Ok(user.into())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: Uuid) -> UserResult<UserIdentity> {
        self.repository
            .get_by_id(id)
            .await?
            .map(UserIdentity::from)
            .ok_or(UserError::NotFound(id))
    }
}

// Password helpers

fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            name: "Ada".to_string(),
            password: "correct horse".to_string(),
        }
    }

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let a = hash_password("correct horse").unwrap();
        let b = hash_password("correct horse").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2"));
        assert!(verify_password("correct horse", &a).unwrap());
        assert!(!verify_password("battery staple", &a).unwrap());
    }

    #[test]
    fn test_corrupt_hash_is_an_error() {
        assert!(matches!(
            verify_password("x", "plaintext"),
            Err(UserError::PasswordHash(_))
        ));
    }

    #[tokio::test]
    async fn test_register_then_authorize() {
        let service = UserService::new(InMemoryUserRepository::new());
        let registered = service.register(register_request("ada@example.test")).await.unwrap();

        let identity = service.authorize("ada@example.test", "correct horse").await.unwrap();
        assert_eq!(identity, registered);
    }

    #[tokio::test]
    async fn test_authorize_distinguishes_failures() {
        let service = UserService::new(InMemoryUserRepository::new());
        service.register(register_request("ada@example.test")).await.unwrap();

        assert!(matches!(
            service.authorize("nobody@example.test", "correct horse").await,
            Err(UserError::UnknownEmail)
        ));
        assert!(matches!(
            service.authorize("ada@example.test", "wrong password").await,
            Err(UserError::WrongPassword)
        ));
        assert!(matches!(
            service.authorize("Ada@example.test", "correct horse").await,
            Err(UserError::UnknownEmail)
        ));
    }

    #[tokio::test]
    async fn test_authorize_requires_both_credentials() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_by_email().times(0);
        let service = UserService::new(repo);

        assert!(matches!(
            service.authorize("", "correct horse").await,
            Err(UserError::Validation(_))
        ));
        assert!(matches!(
            service.authorize("ada@example.test", "").await,
            Err(UserError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password_without_writing() {
        let mut repo = MockUserRepository::new();
        repo.expect_create().times(0);

        let service = UserService::new(repo);
        let mut input = register_request("ada@example.test");
        input.password = "short".to_string();

        assert!(matches!(
            service.register(input).await,
            Err(UserError::InvalidFields(_))
        ));
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_create()
            .withf(|user| user.password_hash != "correct horse" && user.password_hash.starts_with("$argon2"))
            .times(1)
            .returning(Ok);

        let service = UserService::new(repo);
        service.register(register_request("ada@example.test")).await.unwrap();
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let service = UserService::new(InMemoryUserRepository::new());
        service.register(register_request("ada@example.test")).await.unwrap();

        assert!(matches!(
            service.register(register_request("ada@example.test")).await,
            Err(UserError::DuplicateEmail(_))
        ));
    }
}
