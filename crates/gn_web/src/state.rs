use gn_core::{ArticleStorage, SentimentScorer};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub scorer: Arc<dyn SentimentScorer>,
    /// Present only when the article API is enabled.
    pub storage: Option<Arc<dyn ArticleStorage>>,
}

impl AppState {
    pub fn new(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self {
            scorer,
            storage: None,
        }
    }

    pub fn with_storage(mut self, storage: Arc<dyn ArticleStorage>) -> Self {
        self.storage = Some(storage);
        self
    }
}
