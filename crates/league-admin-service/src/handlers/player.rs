//! 球员 API 处理器

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use league_core::dto::{CreatePlayerRequest, PlayerDto, UpdatePlayerRequest};

use super::track;
use crate::{dto::ApiResponse, error::Result, extract::AppJson, state::AppState};

/// GET /Player/ListPlayers
pub async fn list_players(State(state): State<AppState>) -> Result<Json<Vec<PlayerDto>>> {
    Ok(Json(state.players().list_all().await?))
}

/// GET /Player/FindPlayer/{id}
pub async fn find_player(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PlayerDto>> {
    Ok(Json(state.players().get_one(id).await?))
}

/// POST /Player/CreatePlayer
pub async fn create_player(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<PlayerDto>)> {
    let dto = track("player", "create", state.players().create(req).await)?;
    Ok((StatusCode::CREATED, Json(dto)))
}

/// PUT /Player/UpdatePlayer/{id}
pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UpdatePlayerRequest>,
) -> Result<Json<ApiResponse<()>>> {
    track("player", "update", state.players().update(id, req).await)?;
    Ok(Json(ApiResponse::message("球员更新成功")))
}

/// DELETE /Player/DeletePlayer/{id}
pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    track("player", "delete", state.players().delete(id).await)?;
    Ok(Json(ApiResponse::message("球员删除成功")))
}
