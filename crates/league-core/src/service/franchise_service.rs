//! 俱乐部操作

use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use super::dto::{CreateFranchiseRequest, FranchiseDto, UpdateFranchiseRequest};
use super::{ensure_same_id, normalize, resolve_conflict};
use crate::error::{LeagueError, Result};
use crate::models::{Franchise, FranchiseRelation, NewFranchise};
use crate::repository::FranchiseRepositoryTrait;

/// 投影 teamCount / sponsorCount 所需的关联
const FRANCHISE_VIEW: &[FranchiseRelation] =
    &[FranchiseRelation::Teams, FranchiseRelation::Sponsors];

/// 俱乐部操作服务
pub struct FranchiseService<R: FranchiseRepositoryTrait + ?Sized> {
    repo: Arc<R>,
}

impl<R: FranchiseRepositoryTrait + ?Sized> FranchiseService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list_all(&self) -> Result<Vec<FranchiseDto>> {
        let franchises = self.repo.list_franchises(FRANCHISE_VIEW).await?;
        Ok(franchises.iter().map(FranchiseDto::from_entity).collect())
    }

    pub async fn get_one(&self, id: i64) -> Result<FranchiseDto> {
        let franchise = self
            .repo
            .get_franchise(id, FRANCHISE_VIEW)
            .await?
            .ok_or(LeagueError::FranchiseNotFound(id))?;
        Ok(FranchiseDto::from_entity(&franchise))
    }

    #[instrument(skip(self, req), fields(name = %req.name))]
    pub async fn create(&self, req: CreateFranchiseRequest) -> Result<FranchiseDto> {
        req.validate()?;

        let created = self
            .repo
            .insert_franchise(&NewFranchise {
                name: req.name.trim().to_string(),
                home_city: normalize(req.home_city),
                logo_url: normalize(req.logo_url),
            })
            .await?;

        info!(franchise_id = created.id, name = %created.name, "Franchise created");

        // 新建俱乐部尚无子记录，计数为 0
        Ok(FranchiseDto::from_entity(&Franchise {
            teams: Some(vec![]),
            sponsors: Some(vec![]),
            ..created
        }))
    }

    #[instrument(skip(self, req))]
    pub async fn update(&self, id: i64, req: UpdateFranchiseRequest) -> Result<FranchiseDto> {
        ensure_same_id(id, req.id)?;
        req.validate()?;

        let current = self
            .repo
            .get_franchise(id, &[])
            .await?
            .ok_or(LeagueError::FranchiseNotFound(id))?;

        let next = Franchise {
            name: req.name.trim().to_string(),
            home_city: normalize(req.home_city),
            logo_url: normalize(req.logo_url),
            version: req.version.unwrap_or(current.version),
            ..current
        };

        if let Err(err) = self.repo.update_franchise(&next).await {
            return Err(resolve_conflict(err, LeagueError::FranchiseNotFound(id), || async {
                Ok::<_, LeagueError>(self.repo.get_franchise(id, &[]).await?.is_some())
            })
            .await);
        }

        info!(franchise_id = id, "Franchise updated");

        self.get_one(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.repo.delete_franchise(id).await?;
        info!(franchise_id = id, "Franchise deleted");
        Ok(())
    }
}
