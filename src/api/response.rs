use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 统一的API响应包装器
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// 创建成功响应（仅消息）
    pub fn message(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// 辅助函数：创建成功响应
pub fn success<T: Serialize>(data: T) -> impl IntoResponse {
    ApiResponse::success(data)
}

/// 辅助函数：创建成功消息响应
pub fn success_message(message: impl Into<String>) -> impl IntoResponse {
    ApiResponse::<()>::message(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let response = ApiResponse::success("test data");
        assert!(response.success);
        assert_eq!(response.data, Some("test data"));
        assert!(response.message.is_none());
    }

    #[test]
    fn test_message_response_serialization() {
        let response = ApiResponse::<()>::message("done");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "done");
        assert!(json.get("data").is_none());
    }
}
