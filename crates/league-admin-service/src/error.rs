//! 管理后台错误类型定义
//!
//! 将实体操作层的错误映射为 HTTP 状态码与统一的 JSON 错误体

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use league_core::LeagueError;
use serde_json::json;

/// 管理后台错误类型
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    League(#[from] LeagueError),

    #[error("内部错误: {0}")]
    Internal(String),
}

impl AdminError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::League(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Self::League(err) if !err.is_business_error() => StatusCode::INTERNAL_SERVER_ERROR,
            Self::League(err) => match err {
                LeagueError::ConcurrencyConflict { .. }
                | LeagueError::DeleteRestricted { .. }
                | LeagueError::DuplicateLink { .. } => StatusCode::CONFLICT,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::League(err) => err.error_code(),
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::League(err) if !err.is_business_error() => {
                tracing::error!(error = %err, code = err.error_code(), "系统错误");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 请求体解析失败
///
/// 缺失或类型不符的字段视为校验失败，其余（非法 JSON、缺少 Content-Type）视为请求错误
impl From<JsonRejection> for AdminError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        let err = match rejection {
            JsonRejection::JsonDataError(_) => {
                let field = rejected_field(&message).unwrap_or("body").to_string();
                LeagueError::invalid(field, message)
            }
            _ => LeagueError::BadRequest(message),
        };
        Self::League(err)
    }
}

/// 从 serde 的 "missing field `name`" 描述中取出字段名
fn rejected_field(message: &str) -> Option<&str> {
    let rest = message.split("missing field `").nth(1)?;
    rest.split('`').next()
}

/// 接口层 Result 类型别名
pub type Result<T> = std::result::Result<T, AdminError>;
