//! 球队 API 处理器
//!
//! 包含球队增删改查与赞助关联维护

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use league_core::dto::{CreateTeamRequest, SponsorDto, TeamDto, UpdateTeamRequest};

use super::track;
use crate::{dto::ApiResponse, error::Result, extract::AppJson, state::AppState};

/// 获取球队列表
///
/// GET /Team/ListTeams
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<Vec<TeamDto>>> {
    Ok(Json(state.teams().list_all().await?))
}

/// 获取球队详情
///
/// GET /Team/FindTeam/{id}
pub async fn find_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TeamDto>> {
    Ok(Json(state.teams().get_one(id).await?))
}

/// 创建球队
///
/// POST /Team/CreateTeam
pub async fn create_team(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamDto>)> {
    let dto = track("team", "create", state.teams().create(req).await)?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// 更新球队
///
/// PUT /Team/UpdateTeam/{id}
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateTeamRequest>,
) -> Result<Json<ApiResponse<()>>> {
    track("team", "update", state.teams().update(id, req).await)?;
    Ok(Json(ApiResponse::message("球队更新成功")))
}

/// 删除球队（仍有球员时拒绝，赞助关联随之删除）
///
/// DELETE /Team/DeleteTeam/{id}
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    track("team", "delete", state.teams().delete(id).await)?;
    Ok(Json(ApiResponse::message("球队删除成功")))
}

/// 获取球队的赞助商
///
/// GET /Team/ListTeamSponsors/{id}
pub async fn list_team_sponsors(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<SponsorDto>>> {
    Ok(Json(state.teams().list_sponsors(id).await?))
}

/// 关联赞助商
///
/// POST /Team/LinkSponsor/{teamId}/{sponsorId}
pub async fn link_sponsor(
    State(state): State<AppState>,
    Path((team_id, sponsor_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<()>>> {
    track(
        "team_sponsor",
        "link",
        state.teams().link_sponsor(team_id, sponsor_id).await,
    )?;
    Ok(Json(ApiResponse::message("赞助关联已建立")))
}

/// 解除赞助商关联
///
/// DELETE /Team/UnlinkSponsor/{teamId}/{sponsorId}
pub async fn unlink_sponsor(
    State(state): State<AppState>,
    Path((team_id, sponsor_id)): Path<(i64, i64)>,
) -> Result<Json<ApiResponse<()>>> {
    track(
        "team_sponsor",
        "unlink",
        state.teams().unlink_sponsor(team_id, sponsor_id).await,
    )?;
    Ok(Json(ApiResponse::message("赞助关联已解除")))
}
