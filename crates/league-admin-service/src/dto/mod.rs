//! 数据传输对象
//!
//! 实体请求与投影定义在 `league_core::dto`，此处仅包含接口层的统一响应

mod response;

pub use response::ApiResponse;
