use gn_core::{SentimentScorer, SentimentScores};
use super::normalize;

const UP_TERMS: &[&str] = &[
    "surge", "rise", "gain", "rally", "boost", "positive", "bullish", "soar", "jump", "climb",
    "growth", "recovery", "uptrend",
];

const DOWN_TERMS: &[&str] = &[
    "drop", "fall", "decline", "crash", "bearish", "negative", "plunge", "slump", "tumble", "dip",
    "decrease", "downtrend", "fear",
];

/// Weight of a single term hit before normalisation.
const TERM_VALENCE: f64 = 2.0;
const ALPHA: f64 = 15.0;

/// Market-news scorer counting up/down terms in headlines.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    up_terms: Vec<String>,
    down_terms: Vec<String>,
}

impl KeywordScorer {
    pub fn new() -> Self {
        Self::with_terms(UP_TERMS, DOWN_TERMS)
    }

    pub fn with_terms(up_terms: &[&str], down_terms: &[&str]) -> Self {
        Self {
            up_terms: up_terms.iter().map(|t| t.to_lowercase()).collect(),
            down_terms: down_terms.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    fn matches(terms: &[String], token: &str) -> bool {
        terms.iter().any(|term| term_matches(term, token))
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// `token` starts with `term`, or with its stem when the inflection rewrites
/// the last letter (rising, rallied, rallies).
fn term_matches(term: &str, token: &str) -> bool {
    if token.starts_with(term) {
        return true;
    }
    if let Some(stem) = term.strip_suffix('e') {
        if token.strip_prefix(stem).is_some_and(|rest| rest.starts_with("ing")) {
            return true;
        }
    }
    if let Some(stem) = term.strip_suffix('y') {
        if token.strip_prefix(stem).is_some_and(|rest| rest.starts_with('i')) {
            return true;
        }
    }
    false
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

impl SentimentScorer for KeywordScorer {
    fn name(&self) -> &str {
        "keyword"
    }

    fn score(&self, text: &str) -> SentimentScores {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return SentimentScores::neutral();
        }

        let ups = tokens.iter().filter(|t| Self::matches(&self.up_terms, t)).count();
        let downs = tokens.iter().filter(|t| Self::matches(&self.down_terms, t)).count();

        let total = tokens.len() as f64;
        let pos = ups as f64 / total;
        let neg = downs as f64 / total;
        let neu = (1.0 - pos - neg).max(0.0);
        let compound = normalize(TERM_VALENCE * (ups as f64 - downs as f64), ALPHA);

        SentimentScores { neg, neu, pos, compound }
    }
}
