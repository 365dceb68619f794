//! HTTP API server for integration with other systems.
//!
//! Exposes the episode index, full episode records and search as JSON.

use crate::browse::{BrowseState, LevelFilter};
use crate::catalog::{EpisodeDescriptor, EpisodeRecord};
use crate::cli::Output;
use crate::config::Settings;
use crate::library::Library;
use crate::search::SearchResult;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let library = Arc::new(super::open_library(settings).await?);
    let app = router(library);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Hark API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET /health");
    Output::kv("Browse", "GET /episodes?level=&shown=");
    Output::kv("Episode", "GET /episodes/{id}");
    Output::kv("Next", "GET /episodes/{id}/next");
    Output::kv("Previous", "GET /episodes/{id}/previous");
    Output::kv("Search", "GET /search?q=");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router over a started library.
pub fn router(library: Arc<Library>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/episodes", get(list_episodes))
        .route("/episodes/{id}", get(get_episode))
        .route("/episodes/{id}/next", get(next_episode))
        .route("/episodes/{id}/previous", get(previous_episode))
        .route("/search", get(search))
        .layer(cors)
        .with_state(library)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct BrowseParams {
    #[serde(default)]
    level: Option<String>,
    #[serde(default)]
    shown: Option<usize>,
}

#[derive(Serialize)]
struct BrowseResponse {
    level: String,
    total: usize,
    remaining: usize,
    episodes: Vec<EpisodeDescriptor>,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    /// "results" or "cleared" (query too short).
    status: &'static str,
    results: Vec<SearchResult>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health(State(library): State<Arc<Library>>) -> impl IntoResponse {
    let episodes = library.get_index().map(|s| s.len()).unwrap_or(0);
    Json(serde_json::json!({
        "status": "ok",
        "episodes": episodes,
        "loaded_chunks": library.store().loaded_chunks(),
    }))
}

async fn list_episodes(
    State(library): State<Arc<Library>>,
    Query(params): Query<BrowseParams>,
) -> Response {
    let snapshot = match library.index().await {
        Ok(snapshot) => snapshot,
        Err(e) => return error(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    };

    let filter: LevelFilter = params
        .level
        .as_deref()
        .unwrap_or("all")
        .parse()
        .unwrap_or_default();
    let mut state = BrowseState::new(library.settings().browse.page_size);
    state.set_filter(filter.clone());
    if let Some(shown) = params.shown {
        state.show_at_least(shown);
    }

    let page = state.page(&snapshot);
    Json(BrowseResponse {
        level: filter.to_string(),
        total: page.total,
        remaining: page.remaining,
        episodes: page.items.into_iter().cloned().collect(),
    })
    .into_response()
}

async fn get_episode(State(library): State<Arc<Library>>, Path(id): Path<String>) -> Response {
    match library.get_or_load(&id).await {
        Ok(Some(record)) => Json::<EpisodeRecord>(record.as_ref().clone()).into_response(),
        Ok(None) => error(StatusCode::NOT_FOUND, format!("Episode not found: {}", id)),
        Err(e) => error(StatusCode::BAD_GATEWAY, e.to_string()),
    }
}

async fn next_episode(State(library): State<Arc<Library>>, Path(id): Path<String>) -> Response {
    neighbour(library.next(&id).await, &id)
}

async fn previous_episode(State(library): State<Arc<Library>>, Path(id): Path<String>) -> Response {
    neighbour(library.previous(&id).await, &id)
}

fn neighbour(result: crate::Result<Option<EpisodeDescriptor>>, id: &str) -> Response {
    match result {
        Ok(Some(descriptor)) => Json(descriptor).into_response(),
        Ok(None) => error(StatusCode::NOT_FOUND, format!("No neighbouring episode for {}", id)),
        Err(e) => error(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    }
}

async fn search(State(library): State<Arc<Library>>, Query(params): Query<SearchParams>) -> Response {
    // Each request is ranked on its own; concurrent clients never supersede
    // one another.
    let (status, results) = match library.ranked(&params.q).await {
        Ok(Some(results)) => ("results", results.as_ref().clone()),
        Ok(None) => ("cleared", Vec::new()),
        Err(e) => return error(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    };

    Json(SearchResponse {
        query: params.q,
        status,
        results,
    })
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::{record, with_key_word};
    use crate::catalog::Level;
    use crate::source::MemorySource;
    use std::time::Duration;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn library() -> Arc<Library> {
        let source = Arc::new(MemorySource::from_chunks(vec![(
            1,
            vec![
                record("1", "Coffee Shop", Level::Beginner),
                record("2", "Job Interview", Level::Intermediate),
            ],
        )]));
        let library = Arc::new(Library::with_source(Settings::default(), source));
        library.start().await.unwrap();
        library
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_episode_status_codes() {
        let library = library().await;

        let found = get_episode(State(library.clone()), Path("2".to_string())).await;
        assert_eq!(found.status(), StatusCode::OK);

        let missing = get_episode(State(library), Path("404".to_string())).await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_status_codes() {
        let library = library().await;

        let next = next_episode(State(library.clone()), Path("1".to_string())).await;
        assert_eq!(next.status(), StatusCode::OK);

        let past_end = next_episode(State(library), Path("2".to_string())).await;
        assert_eq!(past_end.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_and_browse_ok() {
        let library = library().await;

        let response = search(
            State(library.clone()),
            Query(SearchParams {
                q: "coffee".to_string(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = list_episodes(
            State(library),
            Query(BrowseParams {
                level: Some("beginner".to_string()),
                shown: None,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_browse_with_huge_shown_lists_everything() {
        let library = library().await;

        let response = list_episodes(
            State(library),
            Query(BrowseParams {
                level: None,
                shown: Some(usize::MAX),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["total"], 2);
        assert_eq!(body["remaining"], 0);
        assert_eq!(body["episodes"].as_array().unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_overlapping_search_requests_both_answer() {
        let source = Arc::new(
            MemorySource::from_chunks(vec![
                (1, vec![record("1", "Coffee Shop", Level::Beginner)]),
                (2, vec![with_key_word(record("2", "Market", Level::Beginner), "grocery")]),
            ])
            .with_latency(Duration::from_millis(150)),
        );
        let mut settings = Settings::default();
        settings.search.cache_capacity = 0;
        settings.browse.preload_chunks.clear();
        let library = Arc::new(Library::with_source(settings, source));
        library.start().await.unwrap();

        // The router only builds if its handlers are Send.
        let _app = router(library.clone());

        let query = |q: &str| {
            Query(SearchParams {
                q: q.to_string(),
            })
        };
        let slow = tokio::spawn(search(State(library.clone()), query("grocery")));
        tokio::time::sleep(Duration::from_millis(20)).await;
        let fast = tokio::spawn(search(State(library.clone()), query("coffee")));

        let slow = body_json(slow.await.unwrap()).await;
        assert_eq!(slow["status"], "results");
        assert_eq!(slow["results"][0]["descriptor"]["id"], "2");

        let fast = body_json(fast.await.unwrap()).await;
        assert_eq!(fast["results"][0]["descriptor"]["id"], "1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_search_is_cleared() {
        let library = library().await;

        let response = search(
            State(library),
            Query(SearchParams {
                q: "c".to_string(),
            }),
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["status"], "cleared");
        assert!(body["results"].as_array().unwrap().is_empty());
    }
}
