use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use gn_core::{Article, ArticleStorage, Error, NewArticle, Result, Sentiment, StoreConfig};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;
use crate::StorageBackend;
use super::{like_pattern, sql_bound};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        published_at TEXT NOT NULL,
        description TEXT,
        url TEXT,
        source TEXT,
        sentiment TEXT CHECK (sentiment IN ('positive', 'neutral', 'negative'))
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_articles_published_at ON articles (published_at)
    "#,
];

const COLUMNS: &str = "id, title, published_at, description, url, source, sentiment";

/// Timestamps are stored as fixed-width RFC 3339 text so that ORDER BY on the
/// column is chronological.
fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::Storage(format!("Failed to parse date {}: {}", raw, e)))
}

fn article_from_row(row: &SqliteRow) -> Result<Article> {
    let get_err = |e: sqlx::Error| Error::Database(format!("Failed to read article row: {}", e));
    let published_at: String = row.try_get("published_at").map_err(get_err)?;
    let sentiment: Option<String> = row.try_get("sentiment").map_err(get_err)?;

    Ok(Article {
        id: row.try_get("id").map_err(get_err)?,
        title: row.try_get("title").map_err(get_err)?,
        published_at: decode_timestamp(&published_at)?,
        description: row.try_get("description").map_err(get_err)?,
        url: row.try_get("url").map_err(get_err)?,
        source: row.try_get("source").map_err(get_err)?,
        sentiment: sentiment.as_deref().map(Sentiment::from_str).transpose()?,
    })
}

pub struct SqliteStorage {
    pool: SqlitePool,
}

#[async_trait]
impl StorageBackend for SqliteStorage {
    fn backend_name() -> &'static str {
        "sqlite"
    }

    fn get_error_message() -> &'static str {
        "SQLite database should be reachable at the configured DATABASE_URL (e.g. sqlite:articles.db)"
    }

    async fn connect(config: &StoreConfig) -> Result<Self> {
        Self::new_with_url(&config.url).await
    }
}

impl SqliteStorage {
    pub async fn new_with_url(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| Error::Config(format!("Invalid SQLite URL {}: {}", url, e)))?
            .create_if_missing(true);

        // One exclusive connection, lent out per operation.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to database: {}", e)))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self { pool })
    }

    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::new_with_url(&format!("sqlite:{}", db_path.display())).await
    }

    /// Borrow the connection for one statement; it goes back to the pool when
    /// the guard drops, on success and on error alike.
    async fn acquire(&self) -> Result<PoolConnection<Sqlite>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| Error::Database(format!("Failed to acquire connection: {}", e)))
    }
}

#[async_trait]
impl ArticleStorage for SqliteStorage {
    async fn insert_article(&self, article: &NewArticle) -> Result<i64> {
        article.validate()?;
        let mut conn = self.acquire().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO articles (title, published_at, description, url, source, sentiment)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&article.title)
        .bind(encode_timestamp(&article.published_at))
        .bind(article.description.as_deref())
        .bind(article.url.as_deref())
        .bind(article.source.as_deref())
        .bind(article.sentiment.map(|s| s.as_str()))
        .execute(&mut *conn)
        .await
        .map_err(|e| Error::Database(format!("Failed to store article: {}", e)))?;

        let id = result.last_insert_rowid();
        debug!("Stored article {} ({})", id, article.title);
        Ok(id)
    }

    async fn get_article(&self, id: i64) -> Result<Option<Article>> {
        let mut conn = self.acquire().await?;
        let row = sqlx::query(&format!("SELECT {} FROM articles WHERE id = ?", COLUMNS))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| Error::Database(format!("Failed to get article {}: {}", id, e)))?;

        row.as_ref().map(article_from_row).transpose()
    }

    async fn list_articles(&self) -> Result<Vec<Article>> {
        let mut conn = self.acquire().await?;
        let rows = sqlx::query(&format!(
            "SELECT {} FROM articles ORDER BY published_at DESC, id DESC",
            COLUMNS
        ))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| Error::Database(format!("Failed to list articles: {}", e)))?;

        rows.iter().map(article_from_row).collect()
    }

    async fn list_page(&self, limit: usize, offset: usize) -> Result<Vec<Article>> {
        let mut conn = self.acquire().await?;
        let rows = sqlx::query(&format!(
            "SELECT {} FROM articles ORDER BY published_at DESC, id DESC LIMIT ? OFFSET ?",
            COLUMNS
        ))
        .bind(sql_bound(limit))
        .bind(sql_bound(offset))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| Error::Database(format!("Failed to list articles: {}", e)))?;

        rows.iter().map(article_from_row).collect()
    }

    async fn search_articles(&self, term: &str, limit: usize, offset: usize) -> Result<Vec<Article>> {
        let pattern = like_pattern(term);
        let mut conn = self.acquire().await?;
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM articles
            WHERE title LIKE ? ESCAPE '\' OR description LIKE ? ESCAPE '\'
            ORDER BY published_at DESC, id DESC
            LIMIT ? OFFSET ?
            "#,
            COLUMNS
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(sql_bound(limit))
        .bind(sql_bound(offset))
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| Error::Database(format!("Failed to search articles: {}", e)))?;

        rows.iter().map(article_from_row).collect()
    }

    async fn close(&self) {
        self.pool.close().await;
        debug!("Closed SQLite connection pool");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, SubsecRound};
    use tempfile::tempdir;

    async fn temp_storage(dir: &tempfile::TempDir) -> SqliteStorage {
        SqliteStorage::new_with_path(&dir.path().join("test.db")).await.unwrap()
    }

    #[tokio::test]
    async fn test_sqlite_storage() {
        let temp_dir = tempdir().unwrap();
        let storage = temp_storage(&temp_dir).await;

        let article = NewArticle::new("Gold prices fall amid strong US dollar", Utc::now())
            .with_description("Analysts suggest temporary dip in gold prices as dollar strengthens")
            .with_url("https://example.com/gold-prices-fall")
            .with_sentiment(Sentiment::Negative);

        let id = storage.insert_article(&article).await.unwrap();
        let stored = storage.get_article(id).await.unwrap().unwrap();
        assert_eq!(stored.title, article.title);
        assert_eq!(stored.url, article.url);
        assert_eq!(stored.source, None);
        assert_eq!(stored.sentiment, Some(Sentiment::Negative));
        assert_eq!(stored.published_at, article.published_at.trunc_subsecs(6));

        assert!(storage.get_article(id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sqlite_list_newest_first() {
        let temp_dir = tempdir().unwrap();
        let storage = temp_storage(&temp_dir).await;
        let base = Utc::now();

        for offset in [3, -5, 0, 12, -1] {
            storage
                .insert_article(&NewArticle::new(format!("Article {}", offset), base + Duration::minutes(offset)))
                .await
                .unwrap();
        }

        let articles = storage.list_articles().await.unwrap();
        assert_eq!(articles.len(), 5);
        assert_eq!(articles[0].title, "Article 12");
        for pair in articles.windows(2) {
            assert!(pair[0].published_at >= pair[1].published_at);
        }

        let page = storage.list_page(2, 1).await.unwrap();
        let titles: Vec<_> = page.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Article 3", "Article 0"]);
    }

    #[tokio::test]
    async fn test_sqlite_oversized_page_matches_memory() {
        let temp_dir = tempdir().unwrap();
        let sqlite = temp_storage(&temp_dir).await;
        let memory = crate::InMemoryStorage::new();
        let base = Utc::now();

        for i in 0..3 {
            let article = NewArticle::new(format!("Article {}", i), base + Duration::minutes(i));
            sqlite.insert_article(&article).await.unwrap();
            memory.insert_article(&article).await.unwrap();
        }

        for (limit, offset) in [(10, usize::MAX), (usize::MAX, 0), (usize::MAX, 2), (1, 1)] {
            let from_sqlite: Vec<_> = sqlite.list_page(limit, offset).await.unwrap().into_iter().map(|a| a.title).collect();
            let from_memory: Vec<_> = memory.list_page(limit, offset).await.unwrap().into_iter().map(|a| a.title).collect();
            assert_eq!(from_sqlite, from_memory, "limit={} offset={}", limit, offset);
        }
        assert!(sqlite.search_articles("article", 10, usize::MAX).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_close_releases_pool() {
        let temp_dir = tempdir().unwrap();
        let url = format!("sqlite:{}", temp_dir.path().join("closed.db").display());
        let storage = crate::create_storage(&StoreConfig::parse(&url).unwrap()).await.unwrap();
        storage.insert_article(&NewArticle::new("Gold", Utc::now())).await.unwrap();

        storage.close().await;
        assert!(matches!(storage.list_articles().await, Err(Error::Database(_))));
    }

    #[tokio::test]
    async fn test_sqlite_search() {
        let temp_dir = tempdir().unwrap();
        let storage = temp_storage(&temp_dir).await;
        let now = Utc::now();

        storage
            .insert_article(&NewArticle::new("Central bank buys gold", now))
            .await
            .unwrap();
        storage
            .insert_article(&NewArticle::new("Oil steady", now).with_description("Gold and silver flat"))
            .await
            .unwrap();
        storage
            .insert_article(&NewArticle::new("Stocks 100% up", now))
            .await
            .unwrap();

        assert_eq!(storage.search_articles("GOLD", 10, 0).await.unwrap().len(), 2);
        assert_eq!(storage.search_articles("100%", 10, 0).await.unwrap().len(), 1);
        assert!(storage.search_articles("_", 10, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_rejects_invalid_sentiment() {
        let temp_dir = tempdir().unwrap();
        let storage = temp_storage(&temp_dir).await;

        let result = sqlx::query("INSERT INTO articles (title, published_at, sentiment) VALUES (?, ?, ?)")
            .bind("Gold")
            .bind(encode_timestamp(&Utc::now()))
            .bind("bullish")
            .execute(&storage.pool)
            .await;
        assert!(result.is_err());

        let result = storage.insert_article(&NewArticle::new(" ", Utc::now())).await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(storage.list_articles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sqlite_persists_across_connections() {
        let temp_dir = tempdir().unwrap();
        let id = {
            let storage = temp_storage(&temp_dir).await;
            let id = storage
                .insert_article(&NewArticle::new("Gold demand rises amid global uncertainty", Utc::now()))
                .await
                .unwrap();
            storage.close().await;
            id
        };

        let storage = temp_storage(&temp_dir).await;
        let article = storage.get_article(id).await.unwrap().unwrap();
        assert_eq!(article.title, "Gold demand rises amid global uncertainty");
        assert_eq!(article.sentiment, None);
    }
}
