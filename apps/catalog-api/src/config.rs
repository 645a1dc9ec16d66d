//! Configuration for the Catalog API

use axum_helpers::SessionConfig;
use core_config::{app_info, server::ServerConfig, AppInfo, FromEnv};
use database::mongodb::MongoConfig;
use domain_products::{CloudinaryConfig, UploadLimits};

pub use core_config::Environment;

/// Application configuration, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub mongodb: MongoConfig,
    pub session: SessionConfig,
    pub cloudinary: CloudinaryConfig,
    pub uploads: UploadLimits,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?.with_app_name(app.name);

        Ok(Self {
            app,
            server: ServerConfig::from_env()?,
            environment,
            mongodb,
            session: SessionConfig::from_env()?,
            cloudinary: CloudinaryConfig::from_env()?,
            uploads: UploadLimits::from_env()?,
        })
    }

    /// Session cookies carry `Secure` only behind TLS.
    pub fn secure_cookies(&self) -> bool {
        self.environment.use_https()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIRED: [(&str, Option<&str>); 6] = [
        ("MONGODB_URL", Some("mongodb://localhost:27017")),
        ("MONGODB_DATABASE", Some("catalog")),
        ("SESSION_SECRET", Some("a-session-secret-with-at-least-32-chars")),
        ("CLOUDINARY_CLOUD_NAME", Some("demo")),
        ("CLOUDINARY_API_KEY", Some("123")),
        ("CLOUDINARY_API_SECRET", Some("shh")),
    ];

    /// The required variables with `overrides` applied on top.
    fn env_with(overrides: &[(&'static str, Option<&'static str>)]) -> Vec<(&'static str, Option<&'static str>)> {
        let mut vars: Vec<_> = REQUIRED
            .iter()
            .filter(|(key, _)| !overrides.iter().any(|(k, _)| k == key))
            .copied()
            .collect();
        vars.extend_from_slice(overrides);
        vars
    }

    #[test]
    fn test_config_from_env_with_defaults() {
        let vars = env_with(&[
            ("APP_ENV", None),
            ("PORT", None),
            ("UPLOAD_MAX_FILE_BYTES", None),
            ("SESSION_TTL_SECS", None),
        ]);

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.app.name, "catalog_api");
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.mongodb.database, "catalog");
            assert_eq!(config.mongodb.app_name.as_deref(), Some("catalog_api"));
            assert_eq!(config.uploads, UploadLimits::default());
            assert_eq!(config.session.ttl_secs, 604_800);
            assert!(!config.secure_cookies());
        });
    }

    #[test]
    fn test_production_uses_secure_cookies() {
        let vars = env_with(&[("APP_ENV", Some("production"))]);

        temp_env::with_vars(vars, || {
            assert!(Config::from_env().unwrap().secure_cookies());
        });
    }

    #[test]
    fn test_missing_image_host_credentials_fail() {
        let vars = env_with(&[("CLOUDINARY_API_SECRET", None)]);

        temp_env::with_vars(vars, || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_short_session_secret_fails() {
        let vars = env_with(&[("SESSION_SECRET", Some("short")), ("JWT_SECRET", None)]);

        temp_env::with_vars(vars, || {
            assert!(Config::from_env().is_err());
        });
    }
}
