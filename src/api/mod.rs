use axum::{Router, routing::get};
use std::path::Path;
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::news_api::NewsClient;
use crate::render::PageTemplate;

pub mod error;
pub mod handlers;
pub mod models;

/// Read-only state shared by every request.
pub struct AppState {
    pub news: NewsClient,
    pub template: PageTemplate,
}

pub fn create_router(state: Arc<AppState>, assets_dir: &Path) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/search", get(handlers::search_handler))
        .route("/top-headlines", get(handlers::top_headlines_handler))
        // Static assets (stylesheet, images)
        .nest_service("/assets", ServeDir::new(assets_dir))
        // Unknown paths fall through to the index page.
        .fallback(handlers::index_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
