use super::config::SessionConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,   // user id
    pub email: String, // login email
    pub name: String,  // display name
    pub iat: i64,      // issued at
    pub exp: i64,      // expiry
    pub jti: String,   // token id
}

impl SessionClaims {
    /// The authenticated user's id, if `sub` holds a UUID.
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}

/// Issues and verifies HS256 session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    ttl_secs: i64,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    pub fn new(config: &SessionConfig) -> Self {
        let secret = config.secret.as_bytes();
        tracing::info!(ttl_secs = config.ttl_secs, "Session signing keys initialized");
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret)),
            decoding: Arc::new(DecodingKey::from_secret(secret)),
            ttl_secs: config.ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a fresh token for the given user.
    pub fn issue(&self, user_id: &str, email: &str, name: &str) -> eyre::Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Check signature and expiry, then decode the claims.
    pub fn verify(&self, token: &str) -> eyre::Result<SessionClaims> {
        let data = decode::<SessionClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(secret: &str) -> SessionKeys {
        SessionKeys::new(&SessionConfig::new(secret).unwrap())
    }

    #[test]
    fn test_issue_then_verify() {
        let keys = keys("this-is-a-valid-secret-with-32-chars!");
        let id = Uuid::now_v7().to_string();
        let token = keys.issue(&id, "ada@example.com", "Ada").unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp - claims.iat, keys.ttl_secs());
        assert!(claims.user_id().is_some());
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let token = keys("this-is-a-valid-secret-with-32-chars!")
            .issue("u1", "a@b.c", "A")
            .unwrap();
        assert!(keys("another-valid-secret-that-is-long-enough").verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = SessionConfig::new("this-is-a-valid-secret-with-32-chars!")
            .unwrap()
            .with_ttl(-3600);
        let keys = SessionKeys::new(&config);
        let token = keys.issue("u1", "a@b.c", "A").unwrap();
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(keys("this-is-a-valid-secret-with-32-chars!").verify("not.a.jwt").is_err());
    }
}
