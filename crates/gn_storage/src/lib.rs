use async_trait::async_trait;
use gn_core::{ArticleStorage, Error, Result, StoreConfig, StoreKind};
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

#[async_trait]
pub trait StorageBackend: ArticleStorage + Sized {
    fn backend_name() -> &'static str;

    fn get_error_message() -> &'static str;

    async fn connect(config: &StoreConfig) -> Result<Self>;
}

/// Open the backend selected by the URL scheme of `config`.
pub async fn create_storage(config: &StoreConfig) -> Result<Arc<dyn ArticleStorage>> {
    match config.kind {
        StoreKind::Memory => open::<InMemoryStorage>(config).await,
        #[cfg(feature = "sqlite")]
        StoreKind::Sqlite => open::<SqliteStorage>(config).await,
        #[cfg(feature = "postgres")]
        StoreKind::Postgres => open::<PostgresStorage>(config).await,
        #[allow(unreachable_patterns)]
        kind => Err(Error::Config(format!(
            "Storage backend {:?} is not compiled in; rebuild gn_storage with the matching feature",
            kind
        ))),
    }
}

async fn open<T: StorageBackend + 'static>(config: &StoreConfig) -> Result<Arc<dyn ArticleStorage>> {
    let storage = T::connect(config)
        .await
        .map_err(|e| Error::Storage(format!("{} ({})", e, T::get_error_message())))?;
    info!("💾 Storage initialized (using {})", T::backend_name());
    Ok(Arc::new(storage))
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageBackend};
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use gn_core::NewArticle;

    #[tokio::test]
    async fn test_create_memory_storage() {
        let storage = create_storage(&StoreConfig::memory()).await.unwrap();
        let id = storage
            .insert_article(&NewArticle::new("Gold demand rises amid global uncertainty", Utc::now()))
            .await
            .unwrap();
        assert_eq!(id, 1);
        assert_eq!(storage.list_articles().await.unwrap().len(), 1);
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_create_sqlite_storage() {
        let temp_dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}", temp_dir.path().join("articles.db").display());
        let storage = create_storage(&StoreConfig::parse(&url).unwrap()).await.unwrap();
        let id = storage
            .insert_article(&NewArticle::new("Gold prices fall as US inflation expectations rise", Utc::now()))
            .await
            .unwrap();
        assert!(id > 0);
    }
}
