//! 赞助商仓储（PostgreSQL）

use std::collections::HashMap;

use async_trait::async_trait;

use super::pg_store::{PgLeagueStore, on_foreign_key_violation};
use super::traits::SponsorRepositoryTrait;
use crate::error::{LeagueError, Result};
use crate::models::{NewSponsor, Sponsor, SponsorRelation};

/// 经关联表查询出的赞助商，携带关联方 id
#[derive(sqlx::FromRow)]
struct LinkedSponsor {
    link_id: i64,
    #[sqlx(flatten)]
    sponsor: Sponsor,
}

impl PgLeagueStore {
    /// 按俱乐部分组获取赞助商
    pub(super) async fn sponsors_by_franchise(
        &self,
        franchise_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Sponsor>>> {
        let sponsors = sqlx::query_as::<_, Sponsor>(
            r#"
            SELECT id, name, logo_url, franchise_id, version, created_at, updated_at
            FROM sponsors
            WHERE franchise_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(franchise_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Sponsor>> = HashMap::new();
        for sponsor in sponsors {
            grouped.entry(sponsor.franchise_id).or_default().push(sponsor);
        }
        Ok(grouped)
    }

    /// 按球队分组获取其赞助商
    pub(super) async fn sponsors_by_team(
        &self,
        team_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Sponsor>>> {
        let rows = sqlx::query_as::<_, LinkedSponsor>(
            r#"
            SELECT ts.team_id AS link_id,
                   s.id, s.name, s.logo_url, s.franchise_id,
                   s.version, s.created_at, s.updated_at
            FROM team_sponsors ts
            JOIN sponsors s ON s.id = ts.sponsor_id
            WHERE ts.team_id = ANY($1)
            ORDER BY s.id ASC
            "#,
        )
        .bind(team_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Sponsor>> = HashMap::new();
        for row in rows {
            grouped.entry(row.link_id).or_default().push(row.sponsor);
        }
        Ok(grouped)
    }

    async fn load_sponsor_relations(
        &self,
        sponsors: &mut [Sponsor],
        include: &[SponsorRelation],
    ) -> Result<()> {
        if sponsors.is_empty() {
            return Ok(());
        }

        if include.contains(&SponsorRelation::Franchise) {
            let mut franchise_ids: Vec<i64> = sponsors.iter().map(|s| s.franchise_id).collect();
            franchise_ids.sort_unstable();
            franchise_ids.dedup();
            let franchises = self.franchises_by_ids(&franchise_ids).await?;
            for sponsor in sponsors.iter_mut() {
                sponsor.franchise = franchises.get(&sponsor.franchise_id).cloned().map(Box::new);
            }
        }

        if include.contains(&SponsorRelation::Teams) {
            let ids: Vec<i64> = sponsors.iter().map(|s| s.id).collect();
            let mut grouped = self.teams_by_sponsor(&ids).await?;
            for sponsor in sponsors.iter_mut() {
                sponsor.teams = Some(grouped.remove(&sponsor.id).unwrap_or_default());
            }
        }

        Ok(())
    }
}

fn missing_franchise(franchise_id: i64) -> LeagueError {
    LeagueError::invalid("franchiseId", format!("俱乐部不存在: {}", franchise_id))
}

#[async_trait]
impl SponsorRepositoryTrait for PgLeagueStore {
    async fn list_sponsors(&self, include: &[SponsorRelation]) -> Result<Vec<Sponsor>> {
        let mut sponsors = sqlx::query_as::<_, Sponsor>(
            r#"
            SELECT id, name, logo_url, franchise_id, version, created_at, updated_at
            FROM sponsors
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.load_sponsor_relations(&mut sponsors, include).await?;

        Ok(sponsors)
    }

    async fn get_sponsor(&self, id: i64, include: &[SponsorRelation]) -> Result<Option<Sponsor>> {
        let sponsor = sqlx::query_as::<_, Sponsor>(
            r#"
            SELECT id, name, logo_url, franchise_id, version, created_at, updated_at
            FROM sponsors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(sponsor) = sponsor else {
            return Ok(None);
        };

        let mut loaded = [sponsor];
        self.load_sponsor_relations(&mut loaded, include).await?;
        let [sponsor] = loaded;

        Ok(Some(sponsor))
    }

    async fn list_sponsors_by_team(
        &self,
        team_id: i64,
        include: &[SponsorRelation],
    ) -> Result<Vec<Sponsor>> {
        let mut sponsors = self
            .sponsors_by_team(&[team_id])
            .await?
            .remove(&team_id)
            .unwrap_or_default();

        self.load_sponsor_relations(&mut sponsors, include).await?;

        Ok(sponsors)
    }

    async fn insert_sponsor(&self, sponsor: &NewSponsor) -> Result<Sponsor> {
        sqlx::query_as::<_, Sponsor>(
            r#"
            INSERT INTO sponsors (name, logo_url, franchise_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, logo_url, franchise_id, version, created_at, updated_at
            "#,
        )
        .bind(&sponsor.name)
        .bind(&sponsor.logo_url)
        .bind(sponsor.franchise_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_foreign_key_violation(e, || missing_franchise(sponsor.franchise_id)))
    }

    async fn update_sponsor(&self, sponsor: &Sponsor) -> Result<Sponsor> {
        sqlx::query_as::<_, Sponsor>(
            r#"
            UPDATE sponsors
            SET
                name = $2,
                logo_url = $3,
                franchise_id = $4,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $5
            RETURNING id, name, logo_url, franchise_id, version, created_at, updated_at
            "#,
        )
        .bind(sponsor.id)
        .bind(&sponsor.name)
        .bind(&sponsor.logo_url)
        .bind(sponsor.franchise_id)
        .bind(sponsor.version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| on_foreign_key_violation(e, || missing_franchise(sponsor.franchise_id)))?
        .ok_or(LeagueError::ConcurrencyConflict {
            entity: "sponsor",
            id: sponsor.id,
        })
    }

    async fn delete_sponsor(&self, id: i64) -> Result<()> {
        // team_sponsors 由外键 ON DELETE CASCADE 清理
        let result = sqlx::query("DELETE FROM sponsors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LeagueError::SponsorNotFound(id));
        }

        Ok(())
    }
}
