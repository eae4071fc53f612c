// 目录接口错误类型定义

use thiserror::Error;

/// 目录接口的统一错误类型
///
/// 两类错误都在本地恢复：记录日志后丢弃，列表与搜索结果保持不变。
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// 网络或 HTTP 错误
    #[error("请求失败 (状态码 {}): {message}", display_status(.status))]
    Fetch { status: Option<u16>, message: String },

    /// 响应结构不符合预期
    #[error("响应解析失败: {0}")]
    Parse(String),

    #[error("TMDB API key 未配置")]
    NotConfigured,
}

fn display_status(status: &Option<u16>) -> String {
    status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string())
}

impl CatalogError {
    pub fn fetch(status: Option<u16>, message: impl Into<String>) -> Self {
        CatalogError::Fetch {
            status,
            message: message.into(),
        }
    }

    /// HTTP 状态码（仅 Fetch 错误可能携带）
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Fetch { status, .. } => *status,
            _ => None,
        }
    }
}

// 实现从 reqwest::Error 到 CatalogError 的转换
impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Parse(err.to_string())
        } else if err.is_timeout() {
            CatalogError::fetch(None, "请求超时")
        } else {
            CatalogError::fetch(err.status().map(|s| s.as_u16()), err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}
