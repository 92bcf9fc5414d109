//! 板球联赛管理后台服务
//!
//! 以 JSON 接口暴露俱乐部、球队、球员、赞助商的增删改查。
//!
//! ## 模块结构
//!
//! - `dto`: 接口统一响应结构
//! - `error`: 错误类型与 HTTP 响应映射
//! - `extract`: 请求体提取器
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据验证：validator（在 league-core 的实体操作层完成）
//! - 序列化：serde (camelCase)

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use dto::ApiResponse;
pub use error::{AdminError, Result};
pub use state::AppState;
