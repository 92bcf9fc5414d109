//! 联赛服务错误类型
//!
//! 定义存储网关与实体操作层的业务错误和系统错误

use thiserror::Error;

/// 联赛服务错误类型
#[derive(Debug, Error)]
pub enum LeagueError {
    // === 资源不存在 ===
    #[error("俱乐部不存在: {0}")]
    FranchiseNotFound(i64),

    #[error("球队不存在: {0}")]
    TeamNotFound(i64),

    #[error("球员不存在: {0}")]
    PlayerNotFound(i64),

    #[error("赞助商不存在: {0}")]
    SponsorNotFound(i64),

    #[error("球队赞助关系不存在: team_id={team_id}, sponsor_id={sponsor_id}")]
    LinkNotFound { team_id: i64, sponsor_id: i64 },

    // === 请求错误 ===
    #[error("参数校验失败: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("请求参数错误: {0}")]
    BadRequest(String),

    // === 写冲突 ===
    #[error("并发冲突，记录已被修改: {entity} id={id}")]
    ConcurrencyConflict { entity: &'static str, id: i64 },

    #[error("存在关联数据，无法删除: {entity} id={id}, {reason}")]
    DeleteRestricted {
        entity: &'static str,
        id: i64,
        reason: String,
    },

    #[error("球队赞助关系已存在: team_id={team_id}, sponsor_id={sponsor_id}")]
    DuplicateLink { team_id: i64, sponsor_id: i64 },

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 联赛服务 Result 类型别名
pub type Result<T> = std::result::Result<T, LeagueError>;

impl LeagueError {
    /// 构造字段级校验错误
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 是否为资源不存在类错误
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FranchiseNotFound(_)
                | Self::TeamNotFound(_)
                | Self::PlayerNotFound(_)
                | Self::SponsorNotFound(_)
                | Self::LinkNotFound { .. }
        )
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(self, Self::Database(_) | Self::Internal(_))
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FranchiseNotFound(_) => "FRANCHISE_NOT_FOUND",
            Self::TeamNotFound(_) => "TEAM_NOT_FOUND",
            Self::PlayerNotFound(_) => "PLAYER_NOT_FOUND",
            Self::SponsorNotFound(_) => "SPONSOR_NOT_FOUND",
            Self::LinkNotFound { .. } => "LINK_NOT_FOUND",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
            Self::DeleteRestricted { .. } => "DELETE_RESTRICTED",
            Self::DuplicateLink { .. } => "DUPLICATE_LINK",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// 从 validator 错误转换
///
/// field 为所有失败字段名（按字母序，逗号分隔），message 保留 validator 的完整描述
impl From<validator::ValidationErrors> for LeagueError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors.field_errors();
        let mut fields: Vec<&str> = field_errors.keys().map(|k| k.as_ref()).collect();
        fields.sort_unstable();
        Self::Validation {
            field: fields.join(","),
            message: errors.to_string(),
        }
    }
}
