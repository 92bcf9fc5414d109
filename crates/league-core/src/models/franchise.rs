use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Sponsor, Team};

/// 俱乐部（联赛顶层实体）
///
/// 拥有多支球队与多个赞助商，存在球队或赞助商时禁止删除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Franchise {
    pub id: i64,
    /// 俱乐部名称（1-100 字符）
    pub name: String,
    /// 主场城市
    #[sqlx(default)]
    pub home_city: Option<String>,
    #[sqlx(default)]
    pub logo_url: Option<String>,
    /// 乐观并发版本号，每次更新递增
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<Team>>,
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sponsors: Option<Vec<Sponsor>>,
}

/// 新建俱乐部
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFranchise {
    pub name: String,
    pub home_city: Option<String>,
    pub logo_url: Option<String>,
}

/// 俱乐部可加载的关联
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FranchiseRelation {
    Teams,
    Sponsors,
}
