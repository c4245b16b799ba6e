use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::{HeaderValue, StatusCode};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::presenter::loader::read_locations;
use crate::presenter::PopupRenderer;

#[derive(Clone)]
struct AppState {
    config: Arc<GeneratorConfig>,
    renderer: Arc<PopupRenderer>,
}

/// Static files from the project root plus `/popups/:id`, never cached.
pub fn router(config: GeneratorConfig) -> Result<Router> {
    let serve_dir = ServeDir::new(&config.project_root);
    let state = AppState {
        renderer: Arc::new(PopupRenderer::new()?),
        config: Arc::new(config),
    };

    Ok(Router::new()
        .route("/popups/:id", get(popup))
        .with_state(state)
        .fallback_service(serve_dir)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(TraceLayer::new_for_http()))
}

async fn popup(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Html<String>, (StatusCode, String)> {
    let locations = read_locations(&state.config.output).map_err(|err| {
        error!(error = %err, "Cannot read locations document");
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    })?;
    let location = locations
        .iter()
        .find(|l| l.id == id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("no location {}", id)))?;
    state
        .renderer
        .render(location)
        .map(Html)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))
}
