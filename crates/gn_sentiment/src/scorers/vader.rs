use gn_core::{SentimentScorer, SentimentScores};
use tracing::debug;

/// Valence-aware lexicon scorer backed by the `vader_sentiment` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct VaderScorer;

impl VaderScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for VaderScorer {
    fn name(&self) -> &str {
        "vader"
    }

    fn score(&self, text: &str) -> SentimentScores {
        // The analyzer only borrows the static lexicon, so building one per
        // call keeps the scorer free of shared state.
        let analyzer = vader_sentiment::SentimentIntensityAnalyzer::new();
        let scores = analyzer.polarity_scores(text);
        let component = |key: &str| scores.get(key).copied().unwrap_or(0.0);

        let neg = component("neg");
        let neu = component("neu");
        let pos = component("pos");
        let compound = component("compound");
        debug!("vader scored {} chars: compound={}", text.len(), compound);

        // No sentiment-bearing tokens at all (e.g. empty input) comes back as
        // all zeros; report that as fully neutral.
        if neg + neu + pos == 0.0 {
            return SentimentScores::neutral();
        }

        // vader_sentiment still applies the `!`/`?` amplifier to a zero
        // valence sum, which drags text with no sentiment words below zero.
        if pos == 0.0 && neg == 0.0 {
            return SentimentScores { neg, neu, pos, compound: 0.0 };
        }

        SentimentScores { neg, neu, pos, compound }
    }
}
