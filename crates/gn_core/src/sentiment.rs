use crate::types::{SentimentAnalysis, SentimentScores};

/// A scoring engine: text in, neg/neu/pos/compound out.
pub trait SentimentScorer: Send + Sync {
    fn name(&self) -> &str;

    fn score(&self, text: &str) -> SentimentScores;

    fn analyze(&self, text: &str) -> SentimentAnalysis {
        SentimentAnalysis::from(self.score(text))
    }
}
