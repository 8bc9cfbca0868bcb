use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sentiment error: {0}")]
    Sentiment(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn read_config() -> Result<serde_json::Value> {
        let raw = std::fs::read_to_string("/nonexistent/gn/config.json")?;
        Ok(serde_json::from_str(&raw)?)
    }

    #[test]
    fn test_error_conversions() {
        assert!(matches!(read_config(), Err(Error::Io(_))));

        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
        assert!(err.to_string().starts_with("Serialization error: "));

        assert_eq!(Error::Validation("blank title".into()).to_string(), "Validation error: blank title");
    }
}
