use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Compound scores at or above this value classify as positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Compound scores at or below this value classify as negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Three-way partition of a compound score. Ties at the thresholds go to
    /// the polar side, never to neutral.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_THRESHOLD {
            Self::Positive
        } else if compound <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            other => Err(Error::Validation(format!(
                "Invalid sentiment label: {} (expected positive, neutral or negative)",
                other
            ))),
        }
    }
}

/// Raw output of a scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

impl SentimentScores {
    pub fn neutral() -> Self {
        Self {
            neg: 0.0,
            neu: 1.0,
            pos: 0.0,
            compound: 0.0,
        }
    }
}

/// Scores plus the derived classification, as returned by the service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    #[serde(flatten)]
    pub scores: SentimentScores,
    pub classification: Sentiment,
}

impl From<SentimentScores> for SentimentAnalysis {
    fn from(scores: SentimentScores) -> Self {
        Self {
            classification: Sentiment::from_compound(scores.compound),
            scores,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub sentiment: Option<Sentiment>,
}

/// Insert payload for an article; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source: Option<String>,
    pub sentiment: Option<Sentiment>,
}

impl NewArticle {
    pub fn new(title: impl Into<String>, published_at: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            published_at,
            description: None,
            url: None,
            source: None,
            sentiment: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Text sent to a scorer: the title, followed by the description if any.
    pub fn sentiment_text(&self) -> String {
        match self.description.as_deref() {
            Some(description) if !description.trim().is_empty() => {
                format!("{} {}", self.title, description)
            }
            _ => self.title.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("Article title is required".to_string()));
        }
        Ok(())
    }

    pub fn into_article(self, id: i64) -> Article {
        Article {
            id,
            title: self.title,
            published_at: self.published_at,
            description: self.description,
            url: self.url,
            source: self.source,
            sentiment: self.sentiment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_boundaries() {
        let cases = [
            (-1.0, Sentiment::Negative),
            (-0.05, Sentiment::Negative),
            (-0.049, Sentiment::Neutral),
            (0.0, Sentiment::Neutral),
            (0.049, Sentiment::Neutral),
            (0.05, Sentiment::Positive),
            (1.0, Sentiment::Positive),
        ];
        for (compound, expected) in cases {
            assert_eq!(Sentiment::from_compound(compound), expected, "compound {}", compound);
        }
    }

    #[test]
    fn test_classification_matches_thresholds() {
        for step in -100..=100 {
            let compound = step as f64 / 100.0;
            let label = Sentiment::from_compound(compound);
            assert_eq!(label == Sentiment::Positive, compound >= POSITIVE_THRESHOLD);
            assert_eq!(label == Sentiment::Negative, compound <= NEGATIVE_THRESHOLD);
        }
    }

    #[test]
    fn test_sentiment_parse() {
        assert_eq!("positive".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert_eq!(" Negative ".parse::<Sentiment>().unwrap(), Sentiment::Negative);
        assert_eq!("NEUTRAL".parse::<Sentiment>().unwrap(), Sentiment::Neutral);
        assert!("bullish".parse::<Sentiment>().is_err());
        assert!("".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_analysis_wire_shape() {
        let analysis = SentimentAnalysis::from(SentimentScores {
            neg: 0.0,
            neu: 0.4,
            pos: 0.6,
            compound: 0.6249,
        });
        let value = serde_json::to_value(analysis).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "neg": 0.0,
                "neu": 0.4,
                "pos": 0.6,
                "compound": 0.6249,
                "classification": "positive"
            })
        );
    }

    #[test]
    fn test_new_article_validation() {
        let article = NewArticle::new("   ", Utc::now());
        assert!(matches!(article.validate(), Err(Error::Validation(_))));

        let article = NewArticle::new("Gold prices rise", Utc::now());
        assert!(article.validate().is_ok());
    }

    #[test]
    fn test_sentiment_text() {
        let article = NewArticle::new("Gold prices rise", Utc::now());
        assert_eq!(article.sentiment_text(), "Gold prices rise");

        let article = article.with_description("as investors seek safety");
        assert_eq!(article.sentiment_text(), "Gold prices rise as investors seek safety");
    }
}
