use axum::{extract::State, response::IntoResponse};
use serde_json::json;

use super::error::ApiResult;
use super::response::success;
use super::AppState;

/// 健康检查端点
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let tmdb_status = if state.tmdb_configured {
        "available"
    } else {
        "not_configured"
    };

    Ok(success(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "tmdb_api": tmdb_status,
        "categories": state.session.categories().count(),
    })))
}

/// 获取缓存统计信息
pub async fn cache_stats(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let stats = match state.cache {
        Some(ref cache) => Some(cache.stats().await),
        None => None,
    };

    Ok(success(json!({
        "enabled": stats.is_some(),
        "stats": stats,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

/// 清空所有缓存
pub async fn clear_cache(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    if let Some(ref cache) = state.cache {
        cache.clear_all();
    }

    Ok(success(json!({
        "message": "All caches cleared",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
