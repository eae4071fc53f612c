pub mod categories;
pub mod error;
pub mod health;
pub mod response;
pub mod search;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::external::CatalogCache;
use crate::services::CatalogSession;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<CatalogSession>,
    pub cache: Option<CatalogCache>,
    pub tmdb_configured: bool,
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Unicine Catalog API v0.1" }))
        // Health and cache
        .route("/api/health", get(health::health_check))
        .route("/api/cache/stats", get(health::cache_stats))
        .route("/api/cache/clear", post(health::clear_cache))
        // Categories
        .route("/api/categories", get(categories::list_categories))
        .route(
            "/api/categories/:key",
            get(categories::get_category).delete(categories::unmount_category),
        )
        .route("/api/categories/:key/more", post(categories::load_more))
        // Search
        .route(
            "/api/search",
            get(search::get_search_state).post(search::search_now),
        )
        .route("/api/search/input", post(search::input))
        .route("/api/search/toggle", post(search::toggle))
        .route("/api/search/commit", post(search::commit))
        .route("/api/search/cancel", post(search::cancel))
        .route("/api/navigate", post(search::navigate))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
