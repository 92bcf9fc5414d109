use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Team;

/// 球员
///
/// 存储单一姓名字段与整数年龄（15-60），出生日期仅在投影中推算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub age: i32,
    /// 场上角色，如 Batsman / Bowler / All-rounder / Wicket-keeper
    pub role: String,
    pub team_id: i64,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<Box<Team>>,
}

/// 新建球员
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    pub name: String,
    pub age: i32,
    pub role: String,
    pub team_id: i64,
}

/// 球员可加载的关联
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerRelation {
    Team,
}
