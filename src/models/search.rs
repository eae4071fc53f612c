use serde::{Deserialize, Serialize};

use super::MediaItem;

/// 搜索框的显示状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Hidden,
    Visible,
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible)
    }
}

/// 搜索状态快照
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSnapshot {
    pub query: String,
    pub visible: bool,
    pub click_count: u64,
    pub results: Vec<MediaItem>,
    /// 是否有尚未触发的防抖计时器
    pub pending: bool,
}
