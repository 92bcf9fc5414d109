//! HTTP 请求处理器模块
//!
//! 包含所有 JSON 接口的处理器实现

pub mod franchise;
pub mod health;
pub mod player;
pub mod sponsor;
pub mod team;

use league_core::LeagueError;
use league_shared::observability::metrics::record_entity_mutation;

/// 记录写操作结果指标后原样返回
fn track<T>(
    entity: &str,
    operation: &str,
    result: Result<T, LeagueError>,
) -> Result<T, LeagueError> {
    let outcome = match &result {
        Ok(_) => "ok",
        Err(err) => err.error_code(),
    };
    record_entity_mutation(entity, operation, outcome);
    result
}
