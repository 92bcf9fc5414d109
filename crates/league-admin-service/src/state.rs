//! 应用状态定义
//!
//! 包含 Axum 路由共享的应用状态

use std::sync::Arc;

use league_core::{FranchiseService, LeagueStore, PlayerService, SponsorService, TeamService};

/// Axum 应用共享状态
///
/// 存储句柄通过 Arc 在 handler 间共享，实体操作服务按请求构造
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LeagueStore>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(store: Arc<dyn LeagueStore>) -> Self {
        Self { store }
    }

    pub fn franchises(&self) -> FranchiseService<dyn LeagueStore> {
        FranchiseService::new(self.store.clone())
    }

    pub fn teams(&self) -> TeamService<dyn LeagueStore> {
        TeamService::new(self.store.clone())
    }

    pub fn players(&self) -> PlayerService<dyn LeagueStore> {
        PlayerService::new(self.store.clone())
    }

    pub fn sponsors(&self) -> SponsorService<dyn LeagueStore> {
        SponsorService::new(self.store.clone())
    }
}
