use async_trait::async_trait;
use crate::types::{Article, NewArticle};
use crate::Result;

#[async_trait]
pub trait ArticleStorage: Send + Sync {
    /// Persist a new article and return the id assigned by the store
    async fn insert_article(&self, article: &NewArticle) -> Result<i64>;

    /// Fetch a single article by id
    async fn get_article(&self, id: i64) -> Result<Option<Article>>;

    /// All articles, newest first
    async fn list_articles(&self) -> Result<Vec<Article>>;

    /// One page of articles, newest first
    async fn list_page(&self, limit: usize, offset: usize) -> Result<Vec<Article>>;

    /// Case-insensitive match against title and description, newest first
    async fn search_articles(&self, term: &str, limit: usize, offset: usize) -> Result<Vec<Article>>;

    /// Release the store's connections; later calls fail on pooled backends
    async fn close(&self) {}
}
