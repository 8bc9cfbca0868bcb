use async_trait::async_trait;
use gn_core::{Article, ArticleStorage, NewArticle, Result, StoreConfig};
use tokio::sync::RwLock;
use crate::StorageBackend;

pub struct MemoryStore {
    next_id: i64,
    articles: Vec<Article>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            articles: Vec::new(),
        }
    }

    pub fn insert(&mut self, article: &NewArticle) -> Result<i64> {
        article.validate()?;
        let id = self.next_id;
        self.next_id += 1;
        self.articles.push(article.clone().into_article(id));
        Ok(id)
    }

    pub fn get(&self, id: i64) -> Option<Article> {
        self.articles.iter().find(|a| a.id == id).cloned()
    }

    fn newest_first<'a>(&self, articles: impl Iterator<Item = &'a Article>) -> Vec<Article> {
        let mut articles: Vec<Article> = articles.cloned().collect();
        articles.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        articles
    }

    pub fn list(&self) -> Vec<Article> {
        self.newest_first(self.articles.iter())
    }

    pub fn search(&self, term: &str) -> Vec<Article> {
        let term = term.to_lowercase();
        self.newest_first(self.articles.iter().filter(|a| {
            a.title.to_lowercase().contains(&term)
                || a.description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&term))
        }))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn page(articles: Vec<Article>, limit: usize, offset: usize) -> Vec<Article> {
    articles.into_iter().skip(offset).take(limit).collect()
}

pub struct InMemoryStorage {
    store: RwLock<MemoryStore>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(MemoryStore::new()),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    fn backend_name() -> &'static str {
        "memory"
    }

    fn get_error_message() -> &'static str {
        "Memory storage should be available"
    }

    async fn connect(_config: &StoreConfig) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl ArticleStorage for InMemoryStorage {
    async fn insert_article(&self, article: &NewArticle) -> Result<i64> {
        let mut store = self.store.write().await;
        store.insert(article)
    }

    async fn get_article(&self, id: i64) -> Result<Option<Article>> {
        let store = self.store.read().await;
        Ok(store.get(id))
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(store.list())
    }

    async fn list_page(&self, limit: usize, offset: usize) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(page(store.list(), limit, offset))
    }

    async fn search_articles(&self, term: &str, limit: usize, offset: usize) -> Result<Vec<Article>> {
        let store = self.store.read().await;
        Ok(page(store.search(term), limit, offset))
    }
}
