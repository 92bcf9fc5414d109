//! 球员仓储（PostgreSQL）

use std::collections::HashMap;

use async_trait::async_trait;

use super::pg_store::{PgLeagueStore, on_foreign_key_violation};
use super::traits::PlayerRepositoryTrait;
use crate::error::{LeagueError, Result};
use crate::models::{NewPlayer, Player, PlayerRelation};

impl PgLeagueStore {
    /// 按球队分组获取球员
    pub(super) async fn players_by_team(
        &self,
        team_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Player>>> {
        let players = sqlx::query_as::<_, Player>(
            r#"
            SELECT id, name, age, role, team_id, version, created_at, updated_at
            FROM players
            WHERE team_id = ANY($1)
            ORDER BY id ASC
            "#,
        )
        .bind(team_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<Player>> = HashMap::new();
        for player in players {
            grouped.entry(player.team_id).or_default().push(player);
        }
        Ok(grouped)
    }

    async fn load_player_relations(
        &self,
        players: &mut [Player],
        include: &[PlayerRelation],
    ) -> Result<()> {
        if players.is_empty() || !include.contains(&PlayerRelation::Team) {
            return Ok(());
        }

        let mut team_ids: Vec<i64> = players.iter().map(|p| p.team_id).collect();
        team_ids.sort_unstable();
        team_ids.dedup();
        let teams = self.teams_by_ids(&team_ids).await?;
        for player in players.iter_mut() {
            player.team = teams.get(&player.team_id).cloned().map(Box::new);
        }

        Ok(())
    }
}

fn missing_team(team_id: i64) -> LeagueError {
    LeagueError::invalid("teamId", format!("球队不存在: {}", team_id))
}

#[async_trait]
impl PlayerRepositoryTrait for PgLeagueStore {
    async fn list_players(&self, include: &[PlayerRelation]) -> Result<Vec<Player>> {
        let mut players = sqlx::query_as::<_, Player>(
            r#"
            SELECT id, name, age, role, team_id, version, created_at, updated_at
            FROM players
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.load_player_relations(&mut players, include).await?;

        Ok(players)
    }

    async fn get_player(&self, id: i64, include: &[PlayerRelation]) -> Result<Option<Player>> {
        let player = sqlx::query_as::<_, Player>(
            r#"
            SELECT id, name, age, role, team_id, version, created_at, updated_at
            FROM players
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(player) = player else {
            return Ok(None);
        };

        let mut loaded = [player];
        self.load_player_relations(&mut loaded, include).await?;
        let [player] = loaded;

        Ok(Some(player))
    }

    async fn insert_player(&self, player: &NewPlayer) -> Result<Player> {
        sqlx::query_as::<_, Player>(
            r#"
            INSERT INTO players (name, age, role, team_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, age, role, team_id, version, created_at, updated_at
            "#,
        )
        .bind(&player.name)
        .bind(player.age)
        .bind(&player.role)
        .bind(player.team_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| on_foreign_key_violation(e, || missing_team(player.team_id)))
    }

    async fn update_player(&self, player: &Player) -> Result<Player> {
        sqlx::query_as::<_, Player>(
            r#"
            UPDATE players
            SET
                name = $2,
                age = $3,
                role = $4,
                team_id = $5,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $6
            RETURNING id, name, age, role, team_id, version, created_at, updated_at
            "#,
        )
        .bind(player.id)
        .bind(&player.name)
        .bind(player.age)
        .bind(&player.role)
        .bind(player.team_id)
        .bind(player.version)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| on_foreign_key_violation(e, || missing_team(player.team_id)))?
        .ok_or(LeagueError::ConcurrencyConflict {
            entity: "player",
            id: player.id,
        })
    }

    async fn delete_player(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LeagueError::PlayerNotFound(id));
        }

        Ok(())
    }
}
