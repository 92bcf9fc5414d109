use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Franchise, Player, Sponsor};

/// 球队
///
/// 隶属于一个俱乐部，拥有多名球员，通过 team_sponsors 与赞助商多对多关联
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub name: String,
    /// 所在城市（投影中作为主场 homeGround）
    #[sqlx(default)]
    pub city: Option<String>,
    #[sqlx(default)]
    pub logo_url: Option<String>,
    pub franchise_id: i64,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub franchise: Option<Box<Franchise>>,
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<Player>>,
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsors: Option<Vec<Sponsor>>,
}

/// 新建球队
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    pub name: String,
    pub city: Option<String>,
    pub logo_url: Option<String>,
    pub franchise_id: i64,
}

/// 球队与赞助商的关联（复合主键）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TeamSponsor {
    pub team_id: i64,
    pub sponsor_id: i64,
    pub created_at: DateTime<Utc>,
}

/// 球队可加载的关联
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamRelation {
    Franchise,
    Players,
    Sponsors,
}
