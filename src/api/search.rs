use axum::{extract::State, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::response::success;
use super::AppState;
use crate::models::{MediaItem, Visibility};

#[derive(Debug, Deserialize)]
pub struct SearchTextRequest {
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub results: Vec<MediaItem>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub visibility: Visibility,
    pub click_count: u64,
}

/// 搜索状态快照
pub async fn get_search_state(State(state): State<AppState>) -> impl IntoResponse {
    success(state.session.search_state())
}

/// 立即搜索（不经过防抖）
pub async fn search_now(
    State(state): State<AppState>,
    Json(request): Json<SearchTextRequest>,
) -> ApiResult<impl IntoResponse> {
    let query = request
        .text
        .ok_or_else(|| ApiError::BadRequest("missing field 'text'".to_string()))?;

    let results = state.session.search(&query).await;
    Ok(success(SearchResponse {
        total: results.len(),
        query,
        results,
    }))
}

/// 输入框内容变化
pub async fn input(
    State(state): State<AppState>,
    Json(request): Json<SearchTextRequest>,
) -> impl IntoResponse {
    state.session.input(request.text.as_deref().unwrap_or_default());
    success(state.session.search_state())
}

/// 点击搜索按钮
pub async fn toggle(State(state): State<AppState>) -> impl IntoResponse {
    let visibility = state.session.toggle_search_visibility();
    success(ToggleResponse {
        visibility,
        click_count: state.session.search_state().click_count,
    })
}

/// 提交当前输入
pub async fn commit(State(state): State<AppState>) -> impl IntoResponse {
    state.session.commit_search();
    success(state.session.search_state())
}

/// 取消尚未触发的搜索
pub async fn cancel(State(state): State<AppState>) -> impl IntoResponse {
    state.session.cancel_search();
    success(state.session.search_state())
}

/// 页面导航，清空搜索结果
pub async fn navigate(State(state): State<AppState>) -> impl IntoResponse {
    state.session.navigate();
    success(state.session.search_state())
}
