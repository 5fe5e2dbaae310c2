//! Read-only JSON API
//!
//! Mirrors the feed data as JSON under `/api/v2`. The listing returns
//! every post including private ones; see DESIGN.md for why this is kept
//! as-is.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::models::News;

use super::middleware::{ApiError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/news", get(list_news))
        .route("/news/{id}", get(get_news))
}

/// GET /api/v2/news
async fn list_news(State(state): State<AppState>) -> Result<Json<Vec<News>>, ApiError> {
    let news = state.news_service.list_all().await?;
    Ok(Json(news))
}

/// GET /api/v2/news/{id}
async fn get_news(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<News>, ApiError> {
    state
        .news_service
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("News item not found"))
}
