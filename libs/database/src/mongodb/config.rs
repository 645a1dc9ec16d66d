use std::time::Duration;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse};

/// MongoDB connection and pool settings.
///
/// ```ignore
/// let config = MongoConfig::new("mongodb://localhost:27017", "catalog").with_app_name("catalog-api");
/// // or, with the `config` feature:
/// let config = MongoConfig::from_env()?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// `mongodb://[username:password@]host[:port][/?options]`
    pub url: String,
    pub database: String,
    /// Reported to the server for its logs.
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout: Duration,
    pub server_selection_timeout: Duration,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout: Duration::from_secs(10),
            server_selection_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_pool_size(mut self, max: u32, min: u32) -> Self {
        self.max_pool_size = max;
        self.min_pool_size = min;
        self
    }

    /// URL with any `user:password@` section masked, for logging.
    pub fn redacted_url(&self) -> String {
        match (self.url.find("://"), self.url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://***@{}", &self.url[..scheme_end], &self.url[at + 1..])
            }
            _ => self.url.clone(),
        }
    }
}

#[cfg(feature = "config")]
fn first_of(keys: [&str; 2]) -> Result<String, ConfigError> {
    keys.iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| ConfigError::MissingEnvVar(keys.join(" or ")))
}

/// Environment variables:
/// - `MONGODB_URL` or `MONGO_URL` (required)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (required)
/// - `MONGODB_APP_NAME`
/// - `MONGODB_MAX_POOL_SIZE` (default 100), `MONGODB_MIN_POOL_SIZE` (default 5)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = first_of(["MONGODB_URL", "MONGO_URL"])?;
        let database = first_of(["MONGODB_DATABASE", "MONGO_DATABASE"])?;

        let max_pool_size = env_parse("MONGODB_MAX_POOL_SIZE", 100u32)?;
        let min_pool_size = env_parse("MONGODB_MIN_POOL_SIZE", 5u32)?;
        if min_pool_size > max_pool_size {
            return Err(ConfigError::ParseError {
                key: "MONGODB_MIN_POOL_SIZE".to_string(),
                details: format!("{min_pool_size} exceeds MONGODB_MAX_POOL_SIZE {max_pool_size}"),
            });
        }

        Ok(Self {
            url,
            database,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size,
            min_pool_size,
            connect_timeout: Duration::from_secs(env_parse("MONGODB_CONNECT_TIMEOUT_SECS", 10u64)?),
            server_selection_timeout: Duration::from_secs(env_parse(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                30u64,
            )?),
        })
    }
}
