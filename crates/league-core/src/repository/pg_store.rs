//! PostgreSQL 存储句柄
//!
//! 各实体仓储的 trait 实现分布在对应的 `*_repo.rs` 中

use async_trait::async_trait;
use sqlx::PgPool;

use super::traits::LeagueStore;
use crate::error::{LeagueError, Result};

/// 外键约束违反
const FOREIGN_KEY_VIOLATION: &str = "23503";
/// 唯一约束违反
const UNIQUE_VIOLATION: &str = "23505";

/// 基于 PostgreSQL 的联赛存储
#[derive(Clone)]
pub struct PgLeagueStore {
    pub(super) pool: PgPool,
}

impl PgLeagueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl LeagueStore for PgLeagueStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn has_code(err: &sqlx::Error, code: &str) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|c| c == code)
}

/// 外键违反时转换为业务错误，其余保持数据库错误
pub(super) fn on_foreign_key_violation(
    err: sqlx::Error,
    to_error: impl FnOnce() -> LeagueError,
) -> LeagueError {
    if has_code(&err, FOREIGN_KEY_VIOLATION) {
        to_error()
    } else {
        LeagueError::Database(err)
    }
}

/// 唯一约束违反时转换为业务错误
pub(super) fn on_unique_violation(
    err: sqlx::Error,
    to_error: impl FnOnce() -> LeagueError,
) -> LeagueError {
    if has_code(&err, UNIQUE_VIOLATION) {
        to_error()
    } else {
        on_foreign_key_violation(err, || {
            LeagueError::invalid("teamId,sponsorId", "球队或赞助商不存在")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_pass_through() {
        let err = on_foreign_key_violation(sqlx::Error::RowNotFound, || {
            LeagueError::invalid("franchiseId", "missing")
        });
        assert!(matches!(err, LeagueError::Database(sqlx::Error::RowNotFound)));
    }
}
