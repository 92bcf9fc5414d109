//! 赞助商 API 处理器

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use league_core::dto::{CreateSponsorRequest, SponsorDto, UpdateSponsorRequest};

use super::track;
use crate::{dto::ApiResponse, error::Result, extract::AppJson, state::AppState};

/// 获取赞助商列表
///
/// GET /Sponsor/ListSponsors
pub async fn list_sponsors(State(state): State<AppState>) -> Result<Json<Vec<SponsorDto>>> {
    Ok(Json(state.sponsors().list_all().await?))
}

/// GET /Sponsor/FindSponsor/{id}
pub async fn find_sponsor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SponsorDto>> {
    Ok(Json(state.sponsors().get_one(id).await?))
}

/// 创建赞助商（所属俱乐部必须存在）
///
/// POST /Sponsor/CreateSponsor
pub async fn create_sponsor(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateSponsorRequest>,
) -> Result<(StatusCode, Json<SponsorDto>)> {
    let dto = track("sponsor", "create", state.sponsors().create(req).await)?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// PUT /Sponsor/UpdateSponsor/{id}
pub async fn update_sponsor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateSponsorRequest>,
) -> Result<Json<ApiResponse<()>>> {
    track("sponsor", "update", state.sponsors().update(id, req).await)?;
    Ok(Json(ApiResponse::message("赞助商更新成功")))
}

/// DELETE /Sponsor/DeleteSponsor/{id}
pub async fn delete_sponsor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    track("sponsor", "delete", state.sponsors().delete(id).await)?;
    Ok(Json(ApiResponse::message("赞助商删除成功")))
}
