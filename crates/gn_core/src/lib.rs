pub mod config;
pub mod error;
pub mod sentiment;
pub mod storage;
pub mod types;

pub use config::{ClientConfig, ServiceConfig, StoreConfig, StoreKind};
pub use error::{Error, Result};
pub use sentiment::SentimentScorer;
pub use storage::ArticleStorage;
pub use types::{Article, NewArticle, Sentiment, SentimentAnalysis, SentimentScores};

pub mod prelude {
    pub use super::{Article, ArticleStorage, Error, NewArticle, Result, Sentiment, SentimentScorer};
}
