//! 实体操作层
//!
//! 校验请求、编排存储网关调用，并把实体投影为传输对象。
//!
//! ## 模块结构
//!
//! - `dto`: 请求与投影定义
//! - `franchise_service` / `team_service` / `player_service` / `sponsor_service`:
//!   各实体的 list / get / create / update / delete
//!
//! ## 错误传播
//!
//! 所有写入前完成字段校验与外键存在性校验；更新写入返回并发冲突后
//! 仅复查一次行是否仍存在：已删除则转换为 NotFound，否则原样返回冲突。

use std::future::Future;

use crate::error::{LeagueError, Result};

pub mod dto;
mod franchise_service;
mod player_service;
mod sponsor_service;
mod team_service;

pub use franchise_service::FranchiseService;
pub use player_service::PlayerService;
pub use sponsor_service::SponsorService;
pub use team_service::TeamService;

/// 更新失败后的并发冲突复查
async fn resolve_conflict<F, Fut>(err: LeagueError, not_found: LeagueError, still_exists: F) -> LeagueError
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    if !matches!(err, LeagueError::ConcurrencyConflict { .. }) {
        return err;
    }

    match still_exists().await {
        Ok(true) => err,
        Ok(false) => not_found,
        Err(e) => e,
    }
}

/// 路径 id 与请求体 id 必须一致
fn ensure_same_id(path_id: i64, body_id: i64) -> Result<()> {
    if path_id != body_id {
        return Err(LeagueError::BadRequest(format!(
            "路径 id ({}) 与请求体 id ({}) 不一致",
            path_id, body_id
        )));
    }
    Ok(())
}

/// 空白可选字符串按未填写处理
fn normalize(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
