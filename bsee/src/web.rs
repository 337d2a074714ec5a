pub mod error;

use crate::search_service::SearchService;
use axum::extract::{FromRef, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bsee_api_types::search::SearchResult;
use leptos::prelude::{LeptosOptions, get_configuration};
use serde::Deserialize;
use std::net::SocketAddr;

use self::error::WebError;

#[derive(Clone)]
pub struct WebState {
    pub search: SearchService,
    pub leptos_options: LeptosOptions,
}

impl FromRef<WebState> for SearchService {
    fn from_ref(input: &WebState) -> Self {
        input.search.clone()
    }
}

impl FromRef<WebState> for LeptosOptions {
    fn from_ref(input: &WebState) -> Self {
        input.leptos_options.clone()
    }
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

/// The suggestion widget's endpoint: a JSON array of suggestion
/// strings for the partial query in `q`.
async fn search_suggestions(
    State(search): State<SearchService>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<String>> {
    Json(search.suggest(&params.q))
}

/// Data behind the results page.
async fn search_results(
    State(search): State<SearchService>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<SearchResult>> {
    Json(search.search(&params.q))
}

/// In release mode, return the files from a statically included dir
#[cfg(not(debug_assertions))]
fn get_static_file(path: &str) -> Option<Vec<u8>> {
    use include_dir::include_dir;
    static STATIC_DIR: include_dir::Dir = include_dir!("$CARGO_MANIFEST_DIR/static");
    Some(STATIC_DIR.get_file(path)?.contents().to_vec())
}

/// In debug mode, just load the files from disk
#[cfg(debug_assertions)]
fn get_static_file(path: &str) -> Option<Vec<u8>> {
    std::fs::read(std::path::PathBuf::from("./bsee/static").join(path)).ok()
}

async fn static_path(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');
    let mime_type = mime_guess::from_path(path).first_or_text_plain();
    match get_static_file(path) {
        None => StatusCode::NOT_FOUND.into_response(),
        Some(file) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, mime_type.to_string())],
            file,
        )
            .into_response(),
    }
}

/// JSON API and static assets; the leptos routes are layered on
/// separately in `crate::leptos`.
pub fn api_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    SearchService: FromRef<S>,
{
    Router::new()
        .route("/search-suggestions", get(search_suggestions))
        .route("/api/v1/search", get(search_results))
        .route("/static/{*path}", get(static_path))
}

pub async fn start_web(search: SearchService) -> Result<(), WebError> {
    let conf = get_configuration(None)?;
    let state = WebState {
        search,
        leptos_options: conf.leptos_options,
    };

    let app = crate::leptos::create_leptos_app(&state)
        .merge(api_router())
        .fallback(fallback)
        .with_state(state);

    let port = std::env::var("PORT")
        .map(|p| p.parse::<u16>().ok())
        .ok()
        .flatten()
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}
