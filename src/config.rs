use std::env;

use thiserror::Error;

pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key-change-in-production";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a valid port number, got {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Loaded for parity with deployments that set it; no handler reads it.
    pub secret_key: String,
    pub frontend_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 5000,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://tasks.db".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            secret_key: env::var("SECRET_KEY").unwrap_or_else(|_| DEFAULT_SECRET_KEY.to_string()),
            frontend_origin: env::var("FRONTEND_ORIGIN").ok().filter(|o| !o.is_empty()),
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            frontend_origin: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_joins_host_and_port() {
        let mut config = Config::for_tests();
        config.host = "0.0.0.0".to_string();
        config.port = 5000;
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn default_secret_is_flagged() {
        let mut config = Config::for_tests();
        assert!(config.uses_default_secret());
        config.secret_key = "something-else".to_string();
        assert!(!config.uses_default_secret());
    }
}
