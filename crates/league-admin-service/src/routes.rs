//! 路由配置模块
//!
//! 定义所有 JSON 接口的路由映射

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use league_shared::observability::middleware as obs_middleware;

use crate::{handlers, state::AppState};

fn franchise_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/Franchise/ListFranchises",
            get(handlers::franchise::list_franchises),
        )
        .route(
            "/Franchise/FindFranchise/{id}",
            get(handlers::franchise::find_franchise),
        )
        .route(
            "/Franchise/CreateFranchise",
            post(handlers::franchise::create_franchise),
        )
        .route(
            "/Franchise/UpdateFranchise/{id}",
            put(handlers::franchise::update_franchise),
        )
        .route(
            "/Franchise/DeleteFranchise/{id}",
            delete(handlers::franchise::delete_franchise),
        )
}

/// 球队路由，包含赞助关联维护
fn team_routes() -> Router<AppState> {
    Router::new()
        .route("/Team/ListTeams", get(handlers::team::list_teams))
        .route("/Team/FindTeam/{id}", get(handlers::team::find_team))
        .route("/Team/CreateTeam", post(handlers::team::create_team))
        .route("/Team/UpdateTeam/{id}", put(handlers::team::update_team))
        .route("/Team/DeleteTeam/{id}", delete(handlers::team::delete_team))
        .route(
            "/Team/ListTeamSponsors/{id}",
            get(handlers::team::list_team_sponsors),
        )
        .route(
            "/Team/LinkSponsor/{team_id}/{sponsor_id}",
            post(handlers::team::link_sponsor),
        )
        .route(
            "/Team/UnlinkSponsor/{team_id}/{sponsor_id}",
            delete(handlers::team::unlink_sponsor),
        )
}

fn player_routes() -> Router<AppState> {
    Router::new()
        .route("/Player/ListPlayers", get(handlers::player::list_players))
        .route("/Player/FindPlayer/{id}", get(handlers::player::find_player))
        .route("/Player/CreatePlayer", post(handlers::player::create_player))
        .route(
            "/Player/UpdatePlayer/{id}",
            put(handlers::player::update_player),
        )
        .route(
            "/Player/DeletePlayer/{id}",
            delete(handlers::player::delete_player),
        )
}

fn sponsor_routes() -> Router<AppState> {
    Router::new()
        .route("/Sponsor/ListSponsors", get(handlers::sponsor::list_sponsors))
        .route(
            "/Sponsor/FindSponsor/{id}",
            get(handlers::sponsor::find_sponsor),
        )
        .route(
            "/Sponsor/CreateSponsor",
            post(handlers::sponsor::create_sponsor),
        )
        .route(
            "/Sponsor/UpdateSponsor/{id}",
            put(handlers::sponsor::update_sponsor),
        )
        .route(
            "/Sponsor/DeleteSponsor/{id}",
            delete(handlers::sponsor::delete_sponsor),
        )
}

/// 构建全部实体接口路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(franchise_routes())
        .merge(team_routes())
        .merge(player_routes())
        .merge(sponsor_routes())
}

/// 构建完整应用：实体接口、健康检查与可观测性中间件
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // 可观测性中间件：请求追踪和指标收集
        .layer(middleware::from_fn(obs_middleware::http_tracing))
        .layer(middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}
