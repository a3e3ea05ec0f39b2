use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    crawler::Fetching,
    logger::Logging,
    media_info::{InfoError, MediaInspector},
    service::VideoService,
    video::VideoCandidate,
};

pub struct AppState<F: Fetching, L: Logging> {
    pub service: VideoService<F, L>,
    pub inspector: MediaInspector,
    pub logger: L,
    pub default_query: String,
}

#[derive(Deserialize, Debug)]
pub struct VideoQuery {
    video: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct InfoQuery {
    url: Option<String>,
}

#[derive(Serialize, Debug)]
struct VideosResponse {
    success: bool,
    query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    videos: Vec<VideoCandidate>,
}

impl VideosResponse {
    fn found(query: String, videos: Vec<VideoCandidate>) -> Self {
        VideosResponse {
            success: true,
            query,
            total: Some(videos.len()),
            error: None,
            videos,
        }
    }

    fn failed(query: String, error: String) -> Self {
        VideosResponse {
            success: false,
            query,
            total: None,
            error: Some(error),
            videos: Vec::new(),
        }
    }
}

impl<F: Fetching, L: Logging> AppState<F, L> {
    /// Search term from the query string, the default phrase when absent.
    fn search_term(&self, query: VideoQuery) -> String {
        query
            .video
            .map(|term| term.trim().to_owned())
            .filter(|term| !term.is_empty())
            .unwrap_or_else(|| self.default_query.clone())
    }
}

async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Video Scout API",
        "endpoints": {
            "/recherche?video=<term>": "video results from a web search for the term",
            "/films?video=<term>": "sehatra.com films whose title contains the term",
            "/html?video=<term>": "raw markup of the search page",
            "/info?url=<video url>": "metadata reported by yt-dlp",
        },
        "usage": "/recherche?video=nom_du_film",
    }))
}

async fn recherche<F: Fetching, L: Logging>(
    State(state): State<Arc<AppState<F, L>>>,
    Query(query): Query<VideoQuery>,
) -> Json<VideosResponse> {
    let term = state.search_term(query);
    state.logger.debug(&format!("search request for '{term}'"));
    match state.service.search(&term).await {
        Ok(videos) => Json(VideosResponse::found(term, videos)),
        Err(error) => Json(VideosResponse::failed(term, error.to_string())),
    }
}

async fn films<F: Fetching, L: Logging>(
    State(state): State<Arc<AppState<F, L>>>,
    Query(query): Query<VideoQuery>,
) -> Json<VideosResponse> {
    let term = query.video.unwrap_or_default().trim().to_owned();
    state.logger.debug(&format!("films request for '{term}'"));
    match state.service.films(&term).await {
        Ok(videos) => Json(VideosResponse::found(term, videos)),
        Err(error) => Json(VideosResponse::failed(term, error.to_string())),
    }
}

async fn html<F: Fetching, L: Logging>(
    State(state): State<Arc<AppState<F, L>>>,
    Query(query): Query<VideoQuery>,
) -> Response {
    let term = state.search_term(query);
    match state.service.search_page(&term).await {
        Ok(page) => ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], page).into_response(),
        Err(error) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "success": false,
                "error": error.to_string(),
                "query": term,
            })),
        )
            .into_response(),
    }
}

async fn info<F: Fetching, L: Logging>(
    State(state): State<Arc<AppState<F, L>>>,
    Query(query): Query<InfoQuery>,
) -> Response {
    let Some(url) = query.url.filter(|url| !url.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "missing 'url' parameter" })),
        )
            .into_response();
    };
    match state.inspector.inspect(url.trim(), &state.logger).await {
        Ok(info) => Json(json!({ "success": true, "info": info })).into_response(),
        Err(error) => {
            state.logger.warn(&format!("info for '{url}' failed: {error}"));
            let status = match error {
                InfoError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(json!({ "success": false, "error": error.to_string() })),
            )
                .into_response()
        }
    }
}

pub fn router<F, L>(state: Arc<AppState<F, L>>) -> Router
where
    F: Fetching + 'static,
    L: Logging + 'static,
{
    Router::new()
        .route("/", get(index))
        .route("/recherche", get(recherche::<F, L>))
        .route("/films", get(films::<F, L>))
        .route("/html", get(html::<F, L>))
        .route("/info", get(info::<F, L>))
        .with_state(state)
}

pub async fn serve<F, L>(state: Arc<AppState<F, L>>, addr: SocketAddr) -> Result<()>
where
    F: Fetching + 'static,
    L: Logging + 'static,
{
    state.logger.info(&format!("listening on http://{addr}"));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    axum::serve(listener, router(state))
        .await
        .context("failed to start HTTP server")?;
    Ok(())
}
