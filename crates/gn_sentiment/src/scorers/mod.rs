pub mod keyword;
pub mod vader;

pub use keyword::KeywordScorer;
pub use vader::VaderScorer;

/// VADER's normalisation of a raw valence sum into [-1, 1].
pub(crate) fn normalize(score: f64, alpha: f64) -> f64 {
    let normalized = score / (score * score + alpha).sqrt();
    normalized.clamp(-1.0, 1.0)
}
