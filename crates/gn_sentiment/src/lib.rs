use gn_core::{Error, Result, SentimentAnalysis, SentimentScorer};
use std::sync::Arc;

pub mod client;
pub mod scorers;

pub use client::SentimentClient;
pub use scorers::{KeywordScorer, VaderScorer};

/// Score `text` with `scorer` and classify the compound score.
pub fn analyze(scorer: &dyn SentimentScorer, text: &str) -> SentimentAnalysis {
    scorer.analyze(text)
}

/// Available scorer names, default first.
pub fn scorer_names() -> &'static [&'static str] {
    &["vader", "keyword"]
}

pub fn create_scorer(name: &str) -> Result<Arc<dyn SentimentScorer>> {
    match name.trim().to_lowercase().as_str() {
        "vader" => Ok(Arc::new(VaderScorer::new())),
        "keyword" => Ok(Arc::new(KeywordScorer::new())),
        other => Err(Error::Config(format!(
            "Unknown scorer: {}. Available scorers: {}",
            other,
            scorer_names().join(", ")
        ))),
    }
}

pub mod prelude {
    pub use super::{analyze, create_scorer, SentimentClient};
    pub use gn_core::{Result, Error, Sentiment, SentimentAnalysis, SentimentScorer};
}
