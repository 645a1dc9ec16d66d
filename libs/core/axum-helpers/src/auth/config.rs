//! Session signing configuration.

use core_config::{ConfigError, FromEnv, env_parse};

/// Default session lifetime: 7 days.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 604_800;

const MIN_SECRET_LEN: usize = 32;

/// Session token configuration.
///
/// Loaded from environment variables:
/// - `SESSION_SECRET` (required, falls back to `JWT_SECRET`), at least 32 characters
/// - `SESSION_TTL_SECS` (optional, default 604800)
#[derive(Clone)]
pub struct SessionConfig {
    /// HS256 signing secret
    pub secret: String,
    /// Token and cookie lifetime in seconds
    pub ttl_secs: i64,
}

impl SessionConfig {
    /// Create a config with an explicit secret and the default lifetime.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        check_secret("SESSION_SECRET", &secret)?;
        Ok(Self {
            secret,
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
        })
    }

    pub fn with_ttl(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"[redacted]")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

fn check_secret(key: &str, secret: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::ParseError {
            key: key.to_string(),
            details: format!(
                "must be at least {MIN_SECRET_LEN} characters (got {}). Generate one with: openssl rand -base64 32",
                secret.len()
            ),
        });
    }
    Ok(())
}

impl FromEnv for SessionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let (key, secret) = match std::env::var("SESSION_SECRET") {
            Ok(secret) => ("SESSION_SECRET", secret),
            Err(_) => (
                "JWT_SECRET",
                std::env::var("JWT_SECRET")
                    .map_err(|_| ConfigError::MissingEnvVar("SESSION_SECRET".to_string()))?,
            ),
        };
        check_secret(key, &secret)?;

        let ttl_secs = env_parse("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        if ttl_secs <= 0 {
            return Err(ConfigError::ParseError {
                key: "SESSION_TTL_SECS".to_string(),
                details: "must be positive".to_string(),
            });
        }

        Ok(Self { secret, ttl_secs })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "this-is-a-valid-secret-with-32-chars!";

    #[test]
    fn test_new_rejects_short_secret() {
        assert!(SessionConfig::new("short").is_err());
        assert!(SessionConfig::new(SECRET).is_ok());
    }

    #[test]
    fn test_from_env_defaults_ttl() {
        temp_env::with_vars(
            [
                ("SESSION_SECRET", Some(SECRET)),
                ("SESSION_TTL_SECS", None),
            ],
            || {
                let config = SessionConfig::from_env().unwrap();
                assert_eq!(config.secret, SECRET);
                assert_eq!(config.ttl_secs, DEFAULT_SESSION_TTL_SECS);
            },
        );
    }

    #[test]
    fn test_from_env_falls_back_to_jwt_secret() {
        temp_env::with_vars(
            [("SESSION_SECRET", None), ("JWT_SECRET", Some(SECRET))],
            || {
                let config = SessionConfig::from_env().unwrap();
                assert_eq!(config.secret, SECRET);
            },
        );
    }

    #[test]
    fn test_from_env_missing_secret() {
        temp_env::with_vars_unset(["SESSION_SECRET", "JWT_SECRET"], || {
            let err = SessionConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("SESSION_SECRET"));
        });
    }

    #[test]
    fn test_from_env_short_secret() {
        temp_env::with_var("SESSION_SECRET", Some("short"), || {
            let err = SessionConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("32 characters"));
        });
    }

    #[test]
    fn test_from_env_rejects_non_positive_ttl() {
        temp_env::with_vars(
            [
                ("SESSION_SECRET", Some(SECRET)),
                ("SESSION_TTL_SECS", Some("0")),
            ],
            || {
                assert!(SessionConfig::from_env().is_err());
            },
        );
    }
}
