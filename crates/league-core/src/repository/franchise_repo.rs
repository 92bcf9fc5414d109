//! 俱乐部仓储（PostgreSQL）

use std::collections::HashMap;

use async_trait::async_trait;

use super::pg_store::{PgLeagueStore, on_foreign_key_violation};
use super::traits::FranchiseRepositoryTrait;
use crate::error::{LeagueError, Result};
use crate::models::{Franchise, FranchiseRelation, NewFranchise};

impl PgLeagueStore {
    /// 批量获取俱乐部（按 id 索引）
    pub(super) async fn franchises_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, Franchise>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let franchises = sqlx::query_as::<_, Franchise>(
            r#"
            SELECT id, name, home_city, logo_url, version, created_at, updated_at
            FROM franchises
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(franchises.into_iter().map(|f| (f.id, f)).collect())
    }

    /// 按声明预加载俱乐部关联
    async fn load_franchise_relations(
        &self,
        franchises: &mut [Franchise],
        include: &[FranchiseRelation],
    ) -> Result<()> {
        if franchises.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = franchises.iter().map(|f| f.id).collect();

        if include.contains(&FranchiseRelation::Teams) {
            let mut grouped = self.teams_by_franchise(&ids).await?;
            for franchise in franchises.iter_mut() {
                franchise.teams = Some(grouped.remove(&franchise.id).unwrap_or_default());
            }
        }

        if include.contains(&FranchiseRelation::Sponsors) {
            let mut grouped = self.sponsors_by_franchise(&ids).await?;
            for franchise in franchises.iter_mut() {
                franchise.sponsors = Some(grouped.remove(&franchise.id).unwrap_or_default());
            }
        }

        Ok(())
    }
}

#[async_trait]
impl FranchiseRepositoryTrait for PgLeagueStore {
    async fn list_franchises(&self, include: &[FranchiseRelation]) -> Result<Vec<Franchise>> {
        let mut franchises = sqlx::query_as::<_, Franchise>(
            r#"
            SELECT id, name, home_city, logo_url, version, created_at, updated_at
            FROM franchises
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.load_franchise_relations(&mut franchises, include)
            .await?;

        Ok(franchises)
    }

    async fn get_franchise(
        &self,
        id: i64,
        include: &[FranchiseRelation],
    ) -> Result<Option<Franchise>> {
        let franchise = sqlx::query_as::<_, Franchise>(
            r#"
            SELECT id, name, home_city, logo_url, version, created_at, updated_at
            FROM franchises
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(franchise) = franchise else {
            return Ok(None);
        };

        let mut loaded = [franchise];
        self.load_franchise_relations(&mut loaded, include).await?;
        let [franchise] = loaded;

        Ok(Some(franchise))
    }

    async fn insert_franchise(&self, franchise: &NewFranchise) -> Result<Franchise> {
        let row = sqlx::query_as::<_, Franchise>(
            r#"
            INSERT INTO franchises (name, home_city, logo_url)
            VALUES ($1, $2, $3)
            RETURNING id, name, home_city, logo_url, version, created_at, updated_at
            "#,
        )
        .bind(&franchise.name)
        .bind(&franchise.home_city)
        .bind(&franchise.logo_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn update_franchise(&self, franchise: &Franchise) -> Result<Franchise> {
        sqlx::query_as::<_, Franchise>(
            r#"
            UPDATE franchises
            SET
                name = $2,
                home_city = $3,
                logo_url = $4,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $5
            RETURNING id, name, home_city, logo_url, version, created_at, updated_at
            "#,
        )
        .bind(franchise.id)
        .bind(&franchise.name)
        .bind(&franchise.home_city)
        .bind(&franchise.logo_url)
        .bind(franchise.version)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(LeagueError::ConcurrencyConflict {
            entity: "franchise",
            id: franchise.id,
        })
    }

    async fn delete_franchise(&self, id: i64) -> Result<()> {
        let (team_count, sponsor_count): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM teams WHERE franchise_id = $1),
                (SELECT COUNT(*) FROM sponsors WHERE franchise_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        let restricted = |reason: String| LeagueError::DeleteRestricted {
            entity: "franchise",
            id,
            reason,
        };

        if team_count > 0 || sponsor_count > 0 {
            return Err(restricted(format!(
                "俱乐部下存在 {} 支球队、{} 个赞助商",
                team_count, sponsor_count
            )));
        }

        // 计数与删除之间插入的子记录由外键 RESTRICT 兜底
        let result = sqlx::query("DELETE FROM franchises WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                on_foreign_key_violation(e, || restricted("俱乐部仍被球队或赞助商引用".to_string()))
            })?;

        if result.rows_affected() == 0 {
            return Err(LeagueError::FranchiseNotFound(id));
        }

        Ok(())
    }
}
