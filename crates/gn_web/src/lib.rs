use axum::{routing::get, Router};
use gn_core::{Result, ServiceConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod articles;
pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::analyze_query).post(handlers::analyze_body))
        .route("/health", get(handlers::health))
        .route("/api/articles", get(articles::list_articles))
        .route("/api/articles/search", get(articles::search_articles))
        .route("/api/articles/:id", get(articles::get_article))
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Bind `config.bind_address()` and serve until Ctrl-C.
pub async fn serve(config: &ServiceConfig, state: AppState) -> Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(
        "🚀 Starting sentiment analysis server on {} (scorer: {})",
        listener.local_addr()?,
        state.scorer.name()
    );

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Sentiment analysis server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

pub mod prelude {
    pub use gn_core::{Article, Error, Result};
    pub use crate::{create_app, serve, AppState};
}
