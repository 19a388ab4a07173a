use crate::document::{Corpus, Document, RawRecord, VideoListing};
use crate::engine::KeywordEngine;
use crate::enrich::{collect_corpus, listing_ids, CatalogSource};
use crate::reach::TagReach;
use crate::scoring::ScoredKeyword;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Target language used when a request does not name one
pub const DEFAULT_LANGUAGE: &str = "en";

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    pub seed: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub items: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ReachRequest {
    #[serde(default)]
    pub top_n: Option<usize>,
    #[serde(default)]
    pub items: Vec<RawRecord>,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub seed: String,
    pub language: String,
    pub documents: usize,
    pub keywords: Vec<ScoredKeyword>,
}

#[derive(Debug, Serialize)]
pub struct ReachResponse {
    pub documents: usize,
    pub keywords: Vec<TagReach>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ========== Error Handling ==========

enum AppError {
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::BadRequest(message) = self;
        tracing::warn!("Rejected request: {}", message);

        (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

fn checked_top_n(top_n: Option<usize>, default: usize) -> Result<usize, AppError> {
    match top_n {
        Some(0) => Err(AppError::BadRequest("top_n must be at least 1".to_string())),
        Some(n) => Ok(n),
        None => Ok(default),
    }
}

// ========== Handlers ==========

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK"))
}

async fn ingest(engine: &KeywordEngine, items: Vec<RawRecord>) -> Vec<Document> {
    let listing = VideoListing { items };
    let ids = listing_ids(&listing);
    let source = Arc::new(CatalogSource::new(listing));
    collect_corpus(source, &ids, engine.config().fetch_timeout()).await
}

async fn rank_keywords(
    State(engine): State<Arc<KeywordEngine>>,
    payload: Result<Json<KeywordsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let top_n = checked_top_n(req.top_n, engine.config().top_n)?;
    let language = req
        .language
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

    let documents = ingest(&engine, req.items).await;
    let corpus = Corpus::new(documents, req.seed, language);
    let keywords = engine.rank_top(&corpus, top_n);

    Ok(Json(ApiResponse::success(KeywordsResponse {
        documents: corpus.len(),
        seed: corpus.seed,
        language: corpus.language,
        keywords,
    })))
}

async fn rank_reach(
    State(engine): State<Arc<KeywordEngine>>,
    payload: Result<Json<ReachRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;
    let top_n = checked_top_n(req.top_n, engine.config().reach_top_n)?;
    let documents = ingest(&engine, req.items).await;
    let keywords = engine.rank_by_reach_top(&documents, top_n);

    Ok(Json(ApiResponse::success(ReachResponse {
        documents: documents.len(),
        keywords,
    })))
}

// ========== Router ==========

pub fn create_router(engine: Arc<KeywordEngine>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/keywords", post(rank_keywords))
        .route("/keywords/reach", post(rank_reach))
        .with_state(engine)
}
