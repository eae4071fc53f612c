use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;

use super::error::ApiResult;
use super::response::{success, success_message};
use super::AppState;

#[derive(Debug, Serialize)]
pub struct CategorySummary {
    pub key: String,
    pub title: String,
    pub mounted: bool,
}

/// 分类列表
pub async fn list_categories(State(state): State<AppState>) -> impl IntoResponse {
    let categories: Vec<CategorySummary> = state
        .session
        .categories()
        .map(|category| CategorySummary {
            key: category.key.clone(),
            title: category.title.clone(),
            mounted: state.session.is_mounted(&category.key),
        })
        .collect();

    success(categories)
}

/// 分类当前快照
pub async fn get_category(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    Ok(success(state.session.snapshot(&key)?))
}

/// 加载下一页
pub async fn load_more(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<impl IntoResponse> {
    let snapshot = state.session.load_more(&key).await?;
    Ok(success(snapshot))
}

/// 卸载分类，丢弃已加载的列表
pub async fn unmount_category(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    if state.session.unmount(&key) {
        success_message(format!("Category '{}' unmounted", key))
    } else {
        success_message(format!("Category '{}' was not mounted", key))
    }
}
