//! 球队操作
//!
//! 除基本增删改查外，负责球队与赞助商的关联维护

use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use super::dto::{CreateTeamRequest, SponsorDto, TeamDto, UpdateTeamRequest};
use super::{ensure_same_id, normalize, resolve_conflict};
use crate::error::{LeagueError, Result};
use crate::models::{NewTeam, SponsorRelation, Team, TeamRelation};
use crate::repository::LeagueStore;

/// 投影 franchiseName / playerCount 所需的关联
const TEAM_VIEW: &[TeamRelation] = &[TeamRelation::Franchise, TeamRelation::Players];

/// 球队操作服务
pub struct TeamService<S: LeagueStore + ?Sized> {
    store: Arc<S>,
}

impl<S: LeagueStore + ?Sized> TeamService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<TeamDto>> {
        let teams = self.store.list_teams(TEAM_VIEW).await?;
        Ok(teams.iter().map(TeamDto::from_entity).collect())
    }

    pub async fn get_one(&self, id: i64) -> Result<TeamDto> {
        let team = self
            .store
            .get_team(id, TEAM_VIEW)
            .await?
            .ok_or(LeagueError::TeamNotFound(id))?;
        Ok(TeamDto::from_entity(&team))
    }

    async fn ensure_franchise(&self, franchise_id: i64) -> Result<()> {
        if self.store.get_franchise(franchise_id, &[]).await?.is_none() {
            return Err(LeagueError::invalid(
                "franchiseId",
                format!("俱乐部不存在: {}", franchise_id),
            ));
        }
        Ok(())
    }

    #[instrument(skip(self, req), fields(name = %req.name, franchise_id = req.franchise_id))]
    pub async fn create(&self, req: CreateTeamRequest) -> Result<TeamDto> {
        req.validate()?;
        self.ensure_franchise(req.franchise_id).await?;

        let created = self
            .store
            .insert_team(&NewTeam {
                name: req.name.trim().to_string(),
                city: normalize(req.city),
                logo_url: normalize(req.logo_url),
                franchise_id: req.franchise_id,
            })
            .await?;

        info!(team_id = created.id, name = %created.name, "Team created");

        self.get_one(created.id).await
    }

    #[instrument(skip(self, req))]
    pub async fn update(&self, id: i64, req: UpdateTeamRequest) -> Result<TeamDto> {
        ensure_same_id(id, req.id)?;
        req.validate()?;

        let current = self
            .store
            .get_team(id, &[])
            .await?
            .ok_or(LeagueError::TeamNotFound(id))?;
        self.ensure_franchise(req.franchise_id).await?;

        let next = Team {
            name: req.name.trim().to_string(),
            city: normalize(req.city),
            logo_url: normalize(req.logo_url),
            franchise_id: req.franchise_id,
            version: req.version.unwrap_or(current.version),
            ..current
        };

        if let Err(err) = self.store.update_team(&next).await {
            return Err(resolve_conflict(err, LeagueError::TeamNotFound(id), || async {
                Ok::<_, LeagueError>(self.store.get_team(id, &[]).await?.is_some())
            })
            .await);
        }

        info!(team_id = id, "Team updated");

        self.get_one(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.delete_team(id).await?;
        info!(team_id = id, "Team deleted");
        Ok(())
    }

    /// 球队的赞助商列表
    pub async fn list_sponsors(&self, team_id: i64) -> Result<Vec<SponsorDto>> {
        if self.store.get_team(team_id, &[]).await?.is_none() {
            return Err(LeagueError::TeamNotFound(team_id));
        }

        let sponsors = self
            .store
            .list_sponsors_by_team(team_id, &[SponsorRelation::Franchise, SponsorRelation::Teams])
            .await?;

        Ok(sponsors.iter().map(SponsorDto::from_entity).collect())
    }

    #[instrument(skip(self))]
    pub async fn link_sponsor(&self, team_id: i64, sponsor_id: i64) -> Result<()> {
        self.ensure_link_ends(team_id, sponsor_id).await?;
        self.store.link_sponsor(team_id, sponsor_id).await?;
        info!(team_id, sponsor_id, "Sponsor linked to team");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn unlink_sponsor(&self, team_id: i64, sponsor_id: i64) -> Result<()> {
        self.ensure_link_ends(team_id, sponsor_id).await?;
        self.store.unlink_sponsor(team_id, sponsor_id).await?;
        info!(team_id, sponsor_id, "Sponsor unlinked from team");
        Ok(())
    }

    async fn ensure_link_ends(&self, team_id: i64, sponsor_id: i64) -> Result<()> {
        if self.store.get_team(team_id, &[]).await?.is_none() {
            return Err(LeagueError::TeamNotFound(team_id));
        }
        if self.store.get_sponsor(sponsor_id, &[]).await?.is_none() {
            return Err(LeagueError::SponsorNotFound(sponsor_id));
        }
        Ok(())
    }
}
