//! 接口响应结构

use serde::Serialize;

/// API 统一响应
///
/// 更新、删除等无数据返回的操作序列化为 `{success, code, message}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ApiResponse<()> {
    /// 创建带提示信息的成功响应（无数据）
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_response_omits_data() {
        let body = serde_json::to_value(ApiResponse::message("球队已删除")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "success": true,
                "code": "SUCCESS",
                "message": "球队已删除"
            })
        );
    }
}
