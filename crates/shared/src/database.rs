//! 联赛数据库连接
//!
//! 管理 PostgreSQL 连接池，并在启动时应用联赛表结构迁移：
//! franchises / teams / players / sponsors 四张实体表（各带乐观锁 version 列）
//! 以及 team_sponsors 关联表。俱乐部与球队的子记录外键为 RESTRICT，关联表随两端级联删除。

use crate::config::DatabaseConfig;
use crate::error::{Result, SharedError};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

/// 联赛表结构迁移，编译期从 workspace 根目录 migrations/ 嵌入
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

/// 联赛库连接池
///
/// 克隆共享同一个连接池；`PgLeagueStore` 持有其中的 `PgPool`
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// 创建数据库连接池
    #[instrument(skip(config))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to league database..."
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await?;

        info!("League database pool ready");

        Ok(Self { pool })
    }

    /// 获取连接池引用
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// 启动前的连通性检查，失败时服务不进入监听
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(SharedError::from)
    }

    /// 优雅关闭时释放连接，等待进行中的查询完成
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed");
    }

    /// 应用尚未执行的联赛表结构迁移（已执行的版本记录在 _sqlx_migrations）
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations...");
        MIGRATOR.run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // 需要数据库连接
    async fn test_migrations_create_league_tables() {
        let mut config = DatabaseConfig::default();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.url = url;
        }
        let db = Database::connect(&config).await.unwrap();
        db.health_check().await.unwrap();
        db.run_migrations().await.unwrap();
        // 重复执行为空操作
        db.run_migrations().await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT table_name::TEXT FROM information_schema.tables
            WHERE table_schema = 'public'
              AND table_name IN ('franchises', 'teams', 'players', 'sponsors', 'team_sponsors')
            ORDER BY table_name
            "#,
        )
        .fetch_all(db.pool())
        .await
        .unwrap();
        assert_eq!(
            tables,
            vec!["franchises", "players", "sponsors", "team_sponsors", "teams"]
        );

        db.close().await;
    }
}
