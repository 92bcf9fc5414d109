//! 赞助商操作

use std::sync::Arc;

use tracing::{info, instrument};
use validator::Validate;

use super::dto::{CreateSponsorRequest, SponsorDto, UpdateSponsorRequest};
use super::{ensure_same_id, normalize, resolve_conflict};
use crate::error::{LeagueError, Result};
use crate::models::{NewSponsor, Sponsor, SponsorRelation};
use crate::repository::LeagueStore;

const SPONSOR_VIEW: &[SponsorRelation] = &[SponsorRelation::Franchise, SponsorRelation::Teams];

/// 赞助商操作服务
pub struct SponsorService<S: LeagueStore + ?Sized> {
    store: Arc<S>,
}

impl<S: LeagueStore + ?Sized> SponsorService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn list_all(&self) -> Result<Vec<SponsorDto>> {
        let sponsors = self.store.list_sponsors(SPONSOR_VIEW).await?;
        Ok(sponsors.iter().map(SponsorDto::from_entity).collect())
    }

    pub async fn get_one(&self, id: i64) -> Result<SponsorDto> {
        let sponsor = self
            .store
            .get_sponsor(id, SPONSOR_VIEW)
            .await?
            .ok_or(LeagueError::SponsorNotFound(id))?;
        Ok(SponsorDto::from_entity(&sponsor))
    }

    /// 引用的俱乐部不存在时返回指向 franchiseId 的校验错误，不写入任何数据
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
    pub async fn create(&self, req: CreateSponsorRequest) -> Result<SponsorDto> {
        req.validate()?;
        self.ensure_franchise(req.franchise_id).await?;

        let created = self
            .store
            .insert_sponsor(&NewSponsor {
                name: req.name.trim().to_string(),
                logo_url: normalize(req.logo_url),
                franchise_id: req.franchise_id,
            })
            .await?;

        info!(sponsor_id = created.id, name = %created.name, "Sponsor created");

        self.get_one(created.id).await
    }

    #[instrument(skip(self, req))]
    pub async fn update(&self, id: i64, req: UpdateSponsorRequest) -> Result<SponsorDto> {
        ensure_same_id(id, req.id)?;
        req.validate()?;

        let current = self
            .store
            .get_sponsor(id, &[])
            .await?
            .ok_or(LeagueError::SponsorNotFound(id))?;
        self.ensure_franchise(req.franchise_id).await?;

        let next = Sponsor {
            name: req.name.trim().to_string(),
            logo_url: normalize(req.logo_url),
            franchise_id: req.franchise_id,
            version: req.version.unwrap_or(current.version),
            ..current
        };

        if let Err(err) = self.store.update_sponsor(&next).await {
            return Err(resolve_conflict(err, LeagueError::SponsorNotFound(id), || async {
                Ok::<_, LeagueError>(self.store.get_sponsor(id, &[]).await?.is_some())
            })
            .await);
        }

        info!(sponsor_id = id, "Sponsor updated");

        self.get_one(id).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.delete_sponsor(id).await?;
        info!(sponsor_id = id, "Sponsor deleted");
        Ok(())
    }
}
