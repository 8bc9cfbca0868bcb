//! Process configuration, built once at startup and handed to each component.

use std::time::Duration;
use url::Url;

use crate::types::Sentiment;
use crate::{Error, Result};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8001;
pub const DEFAULT_SCORER: &str = "vader";
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Label used whenever the sentiment service cannot be reached.
pub const FALLBACK_SENTIMENT: Sentiment = Sentiment::Neutral;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Sqlite,
    Postgres,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: String,
    pub kind: StoreKind,
}

impl StoreConfig {
    pub fn parse(url: &str) -> Result<Self> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::Config("Database URL is empty".to_string()));
        }

        let kind = if url.starts_with("memory:") {
            StoreKind::Memory
        } else if url.starts_with("sqlite:") {
            StoreKind::Sqlite
        } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Url::parse(url).map_err(|e| Error::Config(format!("Invalid database URL: {}", e)))?;
            StoreKind::Postgres
        } else {
            return Err(Error::Config(format!(
                "Unsupported database URL scheme: {} (expected memory://, sqlite: or postgres://)",
                url
            )));
        };

        Ok(Self {
            url: url.to_string(),
            kind,
        })
    }

    pub fn memory() -> Self {
        Self {
            url: "memory://".to_string(),
            kind: StoreKind::Memory,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub scorer: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            scorer: DEFAULT_SCORER.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub fallback: Sentiment,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid sentiment service URL {}: {}", base_url, e)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Sentiment service URL must be http(s): {}",
                base_url
            )));
        }
        Ok(Self {
            base_url,
            timeout: DEFAULT_CLIENT_TIMEOUT,
            fallback: FALLBACK_SENTIMENT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(&format!("http://{}:{}/", DEFAULT_HOST, DEFAULT_PORT))
                .expect("default sentiment service URL is valid"),
            timeout: DEFAULT_CLIENT_TIMEOUT,
            fallback: FALLBACK_SENTIMENT,
        }
    }
}
