//! 球员操作

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, instrument};
use validator::Validate;

use super::dto::{CreatePlayerRequest, PlayerDto, UpdatePlayerRequest};
use super::{ensure_same_id, resolve_conflict};
use crate::error::{LeagueError, Result};
use crate::models::{NewPlayer, Player, PlayerRelation};
use crate::repository::LeagueStore;

const PLAYER_VIEW: &[PlayerRelation] = &[PlayerRelation::Team];

/// 姓名解析后的长度约束（validator 只能校验单个字段）
fn validate_resolved_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len == 0 || len > 100 {
        return Err(LeagueError::invalid(
            "name",
            "球员姓名长度必须在1-100个字符之间",
        ));
    }
    Ok(())
}

/// 球员操作服务
pub struct PlayerService<S: LeagueStore + ?Sized> {
    store: Arc<S>,
}

impl<S: LeagueStore + ?Sized> PlayerService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    pub async fn list_all(&self) -> Result<Vec<PlayerDto>> {
        let today = Self::today();
        let players = self.store.list_players(PLAYER_VIEW).await?;
        Ok(players
            .iter()
            .map(|p| PlayerDto::from_entity(p, today))
            .collect())
    }

    pub async fn get_one(&self, id: i64) -> Result<PlayerDto> {
        let player = self
            .store
            .get_player(id, PLAYER_VIEW)
            .await?
            .ok_or(LeagueError::PlayerNotFound(id))?;
        Ok(PlayerDto::from_entity(&player, Self::today()))
    }

    async fn ensure_team(&self, team_id: i64) -> Result<()> {
        if self.store.get_team(team_id, &[]).await?.is_none() {
            return Err(LeagueError::invalid(
                "teamId",
                format!("球队不存在: {}", team_id),
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, req), fields(team_id = req.team_id))]
    pub async fn create(&self, req: CreatePlayerRequest) -> Result<PlayerDto> {
        req.validate()?;
        let name = req.resolved_name();
        validate_resolved_name(&name)?;
        self.ensure_team(req.team_id).await?;

        let created = self
            .store
            .insert_player(&NewPlayer {
                name,
                age: req.age,
                role: req.role.trim().to_string(),
                team_id: req.team_id,
            })
            .await?;

        info!(player_id = created.id, name = %created.name, "Player created");

        self.get_one(created.id).await
    }

    #[instrument(skip(self, req))]
    pub async fn update(&self, id: i64, req: UpdatePlayerRequest) -> Result<PlayerDto> {
        ensure_same_id(id, req.id)?;
        req.validate()?;
        let name = req.resolved_name();
        validate_resolved_name(&name)?;

        let current = self
            .store
            .get_player(id, &[])
            .await?
            .ok_or(LeagueError::PlayerNotFound(id))?;
        self.ensure_team(req.team_id).await?;

        let next = Player {
            name,
            age: req.age,
            role: req.role.trim().to_string(),
            team_id: req.team_id,
            version: req.version.unwrap_or(current.version),
            ..current
        };

        if let Err(err) = self.store.update_player(&next).await {
            return Err(resolve_conflict(err, LeagueError::PlayerNotFound(id), || async {
                Ok::<_, LeagueError>(self.store.get_player(id, &[]).await?.is_some())
            })
            .await);
        }

        info!(player_id = id, "Player updated");

        self.get_one(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.delete_player(id).await?;
        info!(player_id = id, "Player deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewFranchise, NewTeam};
    use crate::repository::{FranchiseRepositoryTrait, MemoryLeagueStore, TeamRepositoryTrait};
    use chrono::Datelike;

    async fn seed() -> (Arc<MemoryLeagueStore>, i64) {
        let store = Arc::new(MemoryLeagueStore::new());
        let franchise = store
            .insert_franchise(&NewFranchise {
                name: "Mumbai".to_string(),
                home_city: None,
                logo_url: None,
            })
            .await
            .unwrap();
        let team = store
            .insert_team(&NewTeam {
                name: "Indians".to_string(),
                city: Some("Mumbai".to_string()),
                logo_url: None,
                franchise_id: franchise.id,
            })
            .await
            .unwrap();
        (store, team.id)
    }

    fn create_request(team_id: i64) -> CreatePlayerRequest {
        CreatePlayerRequest {
            name: None,
            first_name: Some("Rohit".to_string()),
            last_name: Some("Sharma".to_string()),
            age: 25,
            role: "Batsman".to_string(),
            team_id,
        }
    }

    #[tokio::test]
    async fn test_create_joins_name_and_derives_birth_year() {
        let (store, team_id) = seed().await;
        let service = PlayerService::new(store);

        let dto = service.create(create_request(team_id)).await.unwrap();

        assert_eq!(dto.first_name, "Rohit Sharma");
        assert_eq!(dto.last_name, "");
        assert_eq!(dto.position, "Batsman");
        assert_eq!(dto.team_name, "Indians");
        assert_eq!(dto.date_of_birth.year(), Utc::now().year() - 25);
    }

    #[tokio::test]
    async fn test_create_with_missing_team_names_field() {
        let (store, _) = seed().await;
        let service = PlayerService::new(store);

        let err = service.create(create_request(77)).await.unwrap_err();
        match err {
            LeagueError::Validation { field, .. } => assert_eq!(field, "teamId"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_without_any_name_is_rejected() {
        let (store, team_id) = seed().await;
        let service = PlayerService::new(store);

        let mut req = create_request(team_id);
        req.first_name = None;
        req.last_name = Some("  ".to_string());
        let err = service.create(req).await.unwrap_err();
        match err {
            LeagueError::Validation { field, .. } => assert_eq!(field, "name"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_missing_player_is_not_found() {
        let (store, team_id) = seed().await;
        let service = PlayerService::new(store);

        let err = service
            .update(
                9,
                UpdatePlayerRequest {
                    id: 9,
                    version: None,
                    name: Some("Nobody".to_string()),
                    first_name: None,
                    last_name: None,
                    age: 30,
                    role: "Bowler".to_string(),
                    team_id,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LeagueError::PlayerNotFound(9)));
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let (store, team_id) = seed().await;
        let service = PlayerService::new(store);
        let dto = service.create(create_request(team_id)).await.unwrap();

        service.delete(dto.id).await.unwrap();
        let err = service.delete(dto.id).await.unwrap_err();
        assert!(matches!(err, LeagueError::PlayerNotFound(_)));
    }
}
