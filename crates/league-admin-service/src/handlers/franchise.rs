//! 俱乐部 API 处理器

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use league_core::dto::{CreateFranchiseRequest, FranchiseDto, UpdateFranchiseRequest};

use super::track;
use crate::{dto::ApiResponse, error::Result, extract::AppJson, state::AppState};

/// 获取俱乐部列表
///
/// GET /Franchise/ListFranchises
pub async fn list_franchises(State(state): State<AppState>) -> Result<Json<Vec<FranchiseDto>>> {
    Ok(Json(state.franchises().list_all().await?))
}

/// 获取俱乐部详情
///
/// GET /Franchise/FindFranchise/{id}
pub async fn find_franchise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<FranchiseDto>> {
    Ok(Json(state.franchises().get_one(id).await?))
}

/// 创建俱乐部
///
/// POST /Franchise/CreateFranchise
pub async fn create_franchise(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateFranchiseRequest>,
) -> Result<(StatusCode, Json<FranchiseDto>)> {
    let dto = track("franchise", "create", state.franchises().create(req).await)?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// 更新俱乐部
///
/// PUT /Franchise/UpdateFranchise/{id}
pub async fn update_franchise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdateFranchiseRequest>,
) -> Result<Json<ApiResponse<()>>> {
    track("franchise", "update", state.franchises().update(id, req).await)?;
    Ok(Json(ApiResponse::message("俱乐部更新成功")))
}

/// 删除俱乐部
///
/// DELETE /Franchise/DeleteFranchise/{id}
pub async fn delete_franchise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    track("franchise", "delete", state.franchises().delete(id).await)?;
    Ok(Json(ApiResponse::message("俱乐部删除成功")))
}
