//! 球队仓储（PostgreSQL）
//!
//! 包含球队实体与 team_sponsors 关联表的数据访问

use std::collections::HashMap;

use async_trait::async_trait;

use super::pg_store::{PgLeagueStore, on_foreign_key_violation, on_unique_violation};
use super::traits::TeamRepositoryTrait;
use crate::error::{LeagueError, Result};
use crate::models::{NewTeam, Team, TeamRelation};

/// 经关联表查询出的球队，携带关联方 id
#[derive(sqlx::FromRow)]
struct LinkedTeam {
    link_id: i64,
    #[sqlx(flatten)]
    team: Team,
}

impl PgLeagueStore {
    /// 按俱乐部分组获取球队
    pub(super) async fn teams_by_franchise(
        &self,
        franchise_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Team>>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, city, logo_url, franchise_id, version, created_at, updated_at
            FROM teams
            WHERE franchise_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(franchise_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Team>> = HashMap::new();
        for team in teams {
            grouped.entry(team.franchise_id).or_default().push(team);
        }
        Ok(grouped)
    }

    /// 批量获取球队（按 id 索引）
    pub(super) async fn teams_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, Team>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, city, logo_url, franchise_id, version, created_at, updated_at
            FROM teams
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(teams.into_iter().map(|t| (t.id, t)).collect())
    }

    /// 按赞助商分组获取其赞助的球队
    pub(super) async fn teams_by_sponsor(
        &self,
        sponsor_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Team>>> {
        let rows = sqlx::query_as::<_, LinkedTeam>(
            r#"
            SELECT ts.sponsor_id AS link_id,
                   t.id, t.name, t.city, t.logo_url, t.franchise_id,
                   t.version, t.created_at, t.updated_at
            FROM team_sponsors ts
            JOIN teams t ON t.id = ts.team_id
            WHERE ts.sponsor_id = ANY($1)
            ORDER BY t.id ASC
            "#,
        )
        .bind(sponsor_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Team>> = HashMap::new();
        for row in rows {
            grouped.entry(row.link_id).or_default().push(row.team);
        }
        Ok(grouped)
    }

    /// 按声明预加载球队关联
    async fn load_team_relations(&self, teams: &mut [Team], include: &[TeamRelation]) -> Result<()> {
        if teams.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = teams.iter().map(|t| t.id).collect();

        if include.contains(&TeamRelation::Franchise) {
            let mut franchise_ids: Vec<i64> = teams.iter().map(|t| t.franchise_id).collect();
            franchise_ids.sort_unstable();
            franchise_ids.dedup();
            let franchises = self.franchises_by_ids(&franchise_ids).await?;
            for team in teams.iter_mut() {
                team.franchise = franchises.get(&team.franchise_id).cloned().map(Box::new);
            }
        }

        if include.contains(&TeamRelation::Players) {
            let mut grouped = self.players_by_team(&ids).await?;
            for team in teams.iter_mut() {
                team.players = Some(grouped.remove(&team.id).unwrap_or_default());
            }
        }

        if include.contains(&TeamRelation::Sponsors) {
            let mut grouped = self.sponsors_by_team(&ids).await?;
            for team in teams.iter_mut() {
                team.sponsors = Some(grouped.remove(&team.id).unwrap_or_default());
            }
        }

        Ok(())
    }
}

#[async_trait]
impl TeamRepositoryTrait for PgLeagueStore {
    async fn list_teams(&self, include: &[TeamRelation]) -> Result<Vec<Team>> {
        let mut teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, city, logo_url, franchise_id, version, created_at, updated_at
            FROM teams
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.load_team_relations(&mut teams, include).await?;

        Ok(teams)
    }

    async fn get_team(&self, id: i64, include: &[TeamRelation]) -> Result<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, name, city, logo_url, franchise_id, version, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(team) = team else {
            return Ok(None);
        };

        let mut loaded = [team];
        self.load_team_relations(&mut loaded, include).await?;
        let [team] = loaded;

        Ok(Some(team))
    }

    async fn insert_team(&self, team: &NewTeam) -> Result<Team> {
        sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (name, city, logo_url, franchise_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, city, logo_url, franchise_id, version, created_at, updated_at
            "#,
        )
        .bind(&team.name)
        .bind(&team.city)
        .bind(&team.logo_url)
        .bind(team.franchise_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            on_foreign_key_violation(e, || {
                LeagueError::invalid("franchiseId", format!("俱乐部不存在: {}", team.franchise_id))
            })
        })
    }

    async fn update_team(&self, team: &Team) -> Result<Team> {
        sqlx::query_as::<_, Team>(
            r#"
            UPDATE teams
            SET
                name = $2,
                city = $3,
                logo_url = $4,
                franchise_id = $5,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $6
            RETURNING id, name, city, logo_url, franchise_id, version, created_at, updated_at
            "#,
        )
        .bind(team.id)
        .bind(&team.name)
        .bind(&team.city)
        .bind(&team.logo_url)
        .bind(team.franchise_id)
        .bind(team.version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            on_foreign_key_violation(e, || {
                LeagueError::invalid("franchiseId", format!("俱乐部不存在: {}", team.franchise_id))
            })
        })?
        .ok_or(LeagueError::ConcurrencyConflict {
            entity: "team",
            id: team.id,
        })
    }

    async fn delete_team(&self, id: i64) -> Result<()> {
        let player_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM players WHERE team_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if player_count.0 > 0 {
            return Err(LeagueError::DeleteRestricted {
                entity: "team",
                id,
                reason: format!("球队下存在 {} 名球员", player_count.0),
            });
        }

        // team_sponsors 由外键 ON DELETE CASCADE 清理
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                on_foreign_key_violation(e, || LeagueError::DeleteRestricted {
                    entity: "team",
                    id,
                    reason: "球队仍被球员引用".to_string(),
                })
            })?;

        if result.rows_affected() == 0 {
            return Err(LeagueError::TeamNotFound(id));
        }

        Ok(())
    }

    async fn link_sponsor(&self, team_id: i64, sponsor_id: i64) -> Result<()> {
        sqlx::query("INSERT INTO team_sponsors (team_id, sponsor_id) VALUES ($1, $2)")
            .bind(team_id)
            .bind(sponsor_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                on_unique_violation(e, || LeagueError::DuplicateLink {
                    team_id,
                    sponsor_id,
                })
            })?;

        Ok(())
    }

    async fn unlink_sponsor(&self, team_id: i64, sponsor_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM team_sponsors WHERE team_id = $1 AND sponsor_id = $2")
            .bind(team_id)
            .bind(sponsor_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LeagueError::LinkNotFound {
                team_id,
                sponsor_id,
            });
        }

        Ok(())
    }
}
