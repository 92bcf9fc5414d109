use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Franchise, Team};

/// 赞助商
///
/// 隶属于一个俱乐部，可赞助多支球队
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sponsor {
    pub id: i64,
    pub name: String,
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
    pub teams: Option<Vec<Team>>,
}

/// 新建赞助商
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSponsor {
    pub name: String,
    pub logo_url: Option<String>,
    pub franchise_id: i64,
}

/// 赞助商可加载的关联
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SponsorRelation {
    Franchise,
    Teams,
}
