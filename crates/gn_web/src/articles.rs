use axum::{
    extract::{Path, Query, State},
    Json,
};
use gn_core::{Article, ArticleStorage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use crate::{error::ApiError, AppState};

const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PageParams {
    /// Unparseable or zero limits fall back to the default page size.
    fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(DEFAULT_LIMIT)
    }

    fn offset(&self) -> usize {
        self.offset
            .as_deref()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0)
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleList {
    pub articles: Vec<Article>,
}

fn storage(state: &AppState) -> Result<&Arc<dyn ArticleStorage>, ApiError> {
    state
        .storage
        .as_ref()
        .ok_or_else(|| ApiError::not_found("Article storage is not configured"))
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ArticleList>, ApiError> {
    let articles = storage(&state)?
        .list_page(params.limit(), params.offset())
        .await?;
    Ok(Json(ArticleList { articles }))
}

pub async fn search_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<ArticleList>, ApiError> {
    let term = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("Search term is required"))?;

    let articles = storage(&state)?
        .search_articles(term, params.limit(), params.offset())
        .await?;
    Ok(Json(ArticleList { articles }))
}

pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid article ID"))?;

    storage(&state)?
        .get_article(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Article not found"))
}
