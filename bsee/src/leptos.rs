use crate::web::WebState;
use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use bsee_app::{App, shell};
use leptos_axum::{LeptosRoutes, generate_route_list};
use tower_http::services::ServeDir;

async fn custom_handler(State(state): State<WebState>, req: Request<Body>) -> Response {
    let options = state.leptos_options.clone();
    let handler = leptos_axum::render_app_to_stream(move || shell(options.clone()));
    handler(req).await.into_response()
}

/// All the axum routes needed to serve the leptos app and its
/// cargo-leptos JS/WASM bundle.
pub fn create_leptos_app(state: &WebState) -> Router<WebState> {
    let site_root = &state.leptos_options.site_root;
    let pkg_dir = &state.leptos_options.site_pkg_dir;

    // The URL path of the generated JS/WASM bundle from cargo-leptos
    let bundle_path = format!("/{pkg_dir}");
    // The filesystem path of the generated JS/WASM bundle from cargo-leptos
    let bundle_filepath = format!("./{site_root}/{pkg_dir}");
    tracing::info!("serving pkg dir: {bundle_filepath}");

    let routes = generate_route_list(App);

    Router::new()
        .nest_service(&bundle_path, ServeDir::new(&bundle_filepath))
        .leptos_routes_with_handler(routes, custom_handler)
}
