//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use crate::governance::DEFAULT_MAX_CONCURRENCY;
use crate::models::DaoInfo;
use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0), // Bind to 0.0.0.0 for Railway/Docker
            port: 3000,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Governance subgraph configuration
#[derive(Debug, Clone)]
pub struct SubgraphConfig {
    pub url: String,
    pub dao: DaoInfo,
    pub max_concurrency: usize,
    pub timeout: Duration,
}

/// ENS configuration; no endpoint means names are not resolved
#[derive(Debug, Clone, Default)]
pub struct EnsConfig {
    pub subgraph_url: Option<String>,
}

/// Complete application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub subgraph: SubgraphConfig,
    pub ens: EnsConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key -> value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = ServerConfig {
            host: lookup("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        let cors = CorsConfig {
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let subgraph = SubgraphConfig {
            url: Self::required_url(&lookup, "SUBGRAPH_URL")?,
            dao: DaoInfo::new(
                Self::required(&lookup, "DAO_NAME")?,
                Self::required_url(&lookup, "DAO_URL")?,
            ),
            max_concurrency: match lookup("SUBGRAPH_MAX_CONCURRENCY") {
                Some(raw) => match raw.parse::<usize>() {
                    Ok(n) if n >= 1 => n,
                    _ => {
                        return Err(ConfigError::InvalidValue(format!(
                            "SUBGRAPH_MAX_CONCURRENCY must be a positive integer, got {:?}",
                            raw
                        )))
                    }
                },
                None => DEFAULT_MAX_CONCURRENCY,
            },
            timeout: Duration::from_secs(
                lookup("SUBGRAPH_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        };

        let ens = EnsConfig {
            subgraph_url: match lookup("ENS_SUBGRAPH_URL").filter(|s| !s.trim().is_empty()) {
                Some(raw) => Some(Self::parse_url("ENS_SUBGRAPH_URL", &raw)?),
                None => None,
            },
        };

        Ok(Self {
            server,
            cors,
            subgraph,
            ens,
        })
    }

    fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingVar(key.to_string()))
    }

    fn required_url<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = Self::required(lookup, key)?;
        Self::parse_url(key, &raw)
    }

    /// Only http(s) endpoints are accepted
    fn parse_url(key: &str, raw: &str) -> Result<String, ConfigError> {
        match url::Url::parse(raw) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(raw.to_string()),
            Ok(parsed) => Err(ConfigError::InvalidValue(format!(
                "{} must use http or https, got {}",
                key,
                parsed.scheme()
            ))),
            Err(e) => Err(ConfigError::InvalidValue(format!("{} is not a valid URL: {}", key, e))),
        }
    }
}
