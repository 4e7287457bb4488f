// src/api.rs
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use tower_http::cors::CorsLayer;

use crate::feed::{
    self,
    types::{FeedItem, ItemSource},
};
use crate::pipeline::PipelineHandle;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: PipelineHandle,
    pub sources: Arc<Vec<Box<dyn ItemSource>>>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/news", get(news))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct NewsResponse {
    status: &'static str,
    articles: Vec<FeedItem>,
}

/// Fetch all sources, run the pipeline once, return the ranked feed.
/// Per-item drops are expected and silent; the response is always a valid
/// (possibly empty) articles array.
async fn news(State(state): State<AppState>) -> Json<NewsResponse> {
    let raw = feed::run_once(&state.sources).await;
    let articles = state.pipeline.run(raw, Utc::now());
    Json(NewsResponse {
        status: "ok",
        articles,
    })
}
