use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gn_core::{Article, ArticleStorage, Error, NewArticle, Result, Sentiment, StoreConfig};
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, Row};
use std::str::FromStr;
use tracing::debug;
use crate::StorageBackend;
use super::{like_pattern, sql_bound};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        published_at TIMESTAMPTZ NOT NULL,
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

fn article_from_row(row: &PgRow) -> Result<Article> {
    let get_err = |e: sqlx::Error| Error::Database(format!("Failed to read article row: {}", e));
    let published_at: DateTime<Utc> = row.try_get("published_at").map_err(get_err)?;
    let sentiment: Option<String> = row.try_get("sentiment").map_err(get_err)?;

    Ok(Article {
        id: row.try_get("id").map_err(get_err)?,
        title: row.try_get("title").map_err(get_err)?,
        published_at,
        description: row.try_get("description").map_err(get_err)?,
        url: row.try_get("url").map_err(get_err)?,
        source: row.try_get("source").map_err(get_err)?,
        sentiment: sentiment.as_deref().map(Sentiment::from_str).transpose()?,
    })
}

pub struct PostgresStorage {
    pool: PgPool,
}

#[async_trait]
impl StorageBackend for PostgresStorage {
    fn backend_name() -> &'static str {
        "postgres"
    }

    fn get_error_message() -> &'static str {
        "PostgreSQL should be reachable at the configured DATABASE_URL"
    }

    async fn connect(config: &StoreConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(&config.url)
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
}

impl PostgresStorage {
    async fn acquire(&self) -> Result<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .map_err(|e| Error::Database(format!("Failed to acquire connection: {}", e)))
    }
}

#[async_trait]
impl ArticleStorage for PostgresStorage {
    async fn insert_article(&self, article: &NewArticle) -> Result<i64> {
        article.validate()?;
        let mut conn = self.acquire().await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO articles (title, published_at, description, url, source, sentiment)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&article.title)
        .bind(article.published_at)
        .bind(article.description.as_deref())
        .bind(article.url.as_deref())
        .bind(article.source.as_deref())
        .bind(article.sentiment.map(|s| s.as_str()))
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| Error::Database(format!("Failed to store article: {}", e)))?;

        debug!("Stored article {} ({})", id, article.title);
        Ok(id)
    }

    async fn get_article(&self, id: i64) -> Result<Option<Article>> {
        let mut conn = self.acquire().await?;
        let row = sqlx::query(&format!("SELECT {} FROM articles WHERE id = $1", COLUMNS))
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
            "SELECT {} FROM articles ORDER BY published_at DESC, id DESC LIMIT $1 OFFSET $2",
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
            WHERE title ILIKE $1 ESCAPE '\' OR description ILIKE $1 ESCAPE '\'
            ORDER BY published_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
            COLUMNS
        ))
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
        debug!("Closed PostgreSQL connection pool");
    }
}
