use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" | "staging" => Some(Self::Production),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub source_database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub environment: Environment,
    pub default_batch_size: i64,
    pub recent_jobs_limit: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let environment = match env::var("APP_ENV") {
            Ok(value) => Environment::from_str(&value)
                .with_context(|| format!("APP_ENV has unknown value '{}'", value))?,
            Err(_) => Environment::Production,
        };

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            source_database_url: env::var("SOURCE_DATABASE_URL")
                .context("SOURCE_DATABASE_URL must be set")?,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            environment,
            default_batch_size: env::var("DEFAULT_BATCH_SIZE")
                .unwrap_or_else(|_| "50".to_string())
                .parse()
                .context("DEFAULT_BATCH_SIZE must be an integer")?,
            recent_jobs_limit: env::var("RECENT_JOBS_LIMIT")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("RECENT_JOBS_LIMIT must be a positive integer")?,
        })
    }

    /// Whether failure responses may carry full error detail.
    pub fn debug(&self) -> bool {
        self.environment == Environment::Development
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str("Development"), Some(Environment::Development));
        assert_eq!(Environment::from_str("prod"), Some(Environment::Production));
        assert_eq!(Environment::from_str("qa"), None);
    }
}
