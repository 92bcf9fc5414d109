//! 仓储 Trait 定义
//!
//! 定义存储网关接口，实体操作层依赖抽象而非具体实现，支持 mock 测试。
//!
//! 约定：
//! - `include` 精确声明需要预加载的关联，未声明的关联保持 `None`
//! - `update_*` 以实体携带的 `version` 做比较交换，版本不一致或行已不存在时
//!   返回 `ConcurrencyConflict`，由调用方再确认是否为 NotFound
//! - `delete_*` 未删除任何行时返回对应的 NotFound，仍被引用时返回 `DeleteRestricted`

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    Franchise, FranchiseRelation, NewFranchise, NewPlayer, NewSponsor, NewTeam, Player,
    PlayerRelation, Sponsor, SponsorRelation, Team, TeamRelation,
};

/// 俱乐部仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FranchiseRepositoryTrait: Send + Sync {
    async fn list_franchises(&self, include: &[FranchiseRelation]) -> Result<Vec<Franchise>>;
    async fn get_franchise(
        &self,
        id: i64,
        include: &[FranchiseRelation],
    ) -> Result<Option<Franchise>>;
    async fn insert_franchise(&self, franchise: &NewFranchise) -> Result<Franchise>;
    async fn update_franchise(&self, franchise: &Franchise) -> Result<Franchise>;
    async fn delete_franchise(&self, id: i64) -> Result<()>;
}

/// 球队仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamRepositoryTrait: Send + Sync {
    async fn list_teams(&self, include: &[TeamRelation]) -> Result<Vec<Team>>;
    async fn get_team(&self, id: i64, include: &[TeamRelation]) -> Result<Option<Team>>;
    async fn insert_team(&self, team: &NewTeam) -> Result<Team>;
    async fn update_team(&self, team: &Team) -> Result<Team>;
    /// 删除球队，赞助关联随之删除，仍有球员时拒绝
    async fn delete_team(&self, id: i64) -> Result<()>;

    // 球队-赞助商关联
    async fn link_sponsor(&self, team_id: i64, sponsor_id: i64) -> Result<()>;
    async fn unlink_sponsor(&self, team_id: i64, sponsor_id: i64) -> Result<()>;
}

/// 球员仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepositoryTrait: Send + Sync {
    async fn list_players(&self, include: &[PlayerRelation]) -> Result<Vec<Player>>;
    async fn get_player(&self, id: i64, include: &[PlayerRelation]) -> Result<Option<Player>>;
    async fn insert_player(&self, player: &NewPlayer) -> Result<Player>;
    async fn update_player(&self, player: &Player) -> Result<Player>;
    async fn delete_player(&self, id: i64) -> Result<()>;
}

/// 赞助商仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SponsorRepositoryTrait: Send + Sync {
    async fn list_sponsors(&self, include: &[SponsorRelation]) -> Result<Vec<Sponsor>>;
    async fn get_sponsor(&self, id: i64, include: &[SponsorRelation]) -> Result<Option<Sponsor>>;
    /// 与指定球队关联的赞助商，按 id 排序
    async fn list_sponsors_by_team(
        &self,
        team_id: i64,
        include: &[SponsorRelation],
    ) -> Result<Vec<Sponsor>>;
    async fn insert_sponsor(&self, sponsor: &NewSponsor) -> Result<Sponsor>;
    async fn update_sponsor(&self, sponsor: &Sponsor) -> Result<Sponsor>;
    /// 删除赞助商，赞助关联随之删除
    async fn delete_sponsor(&self, id: i64) -> Result<()>;
}

/// 联赛存储句柄
///
/// 聚合全部实体仓储，作为实体操作的显式存储参数在请求间共享
#[async_trait]
pub trait LeagueStore:
    FranchiseRepositoryTrait + TeamRepositoryTrait + PlayerRepositoryTrait + SponsorRepositoryTrait
{
    /// 存储连通性检查（就绪探针使用）
    async fn ping(&self) -> Result<()>;
}
