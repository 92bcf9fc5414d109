//! 实体操作的传输对象
//!
//! 请求 DTO 携带字段约束（validator），响应投影由实体转换而来，
//! 投影为全函数：未加载的关联一律取默认值（0、空串或 "Unknown"）而非失败。

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{Franchise, Player, Sponsor, Team};

/// 关联实体缺失时的显示名
pub const UNKNOWN_NAME: &str = "Unknown";

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("不能为空白字符".into());
        return Err(err);
    }
    Ok(())
}

// ==================== 请求 ====================

// 字符串字段在反序列化时去除首尾空白，长度约束作用于实际写入的值
fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|value| value.trim().to_string())
}

fn trimmed_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(deserializer).map(|value| value.map(|v| v.trim().to_string()))
}

/// 创建俱乐部请求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFranchiseRequest {
    #[validate(
        length(min = 1, max = 100, message = "俱乐部名称长度必须在1-100个字符之间"),
        custom(function = "not_blank")
    )]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[validate(length(max = 100, message = "主场城市不能超过100个字符"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub home_city: Option<String>,
    #[validate(length(max = 255, message = "Logo 地址不能超过255个字符"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub logo_url: Option<String>,
}

/// 更新俱乐部请求
///
/// `id` 必须与路径参数一致；`version` 缺省时使用读取到的当前版本
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFranchiseRequest {
    pub id: i64,
    pub version: Option<i32>,
    #[validate(
        length(min = 1, max = 100, message = "俱乐部名称长度必须在1-100个字符之间"),
        custom(function = "not_blank")
    )]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[validate(length(max = 100, message = "主场城市不能超过100个字符"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub home_city: Option<String>,
    #[validate(length(max = 255, message = "Logo 地址不能超过255个字符"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub logo_url: Option<String>,
}

/// 创建球队请求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamRequest {
    #[validate(
        length(min = 1, max = 100, message = "球队名称长度必须在1-100个字符之间"),
        custom(function = "not_blank")
    )]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    /// 投影中的 homeGround，写入时两个字段名均接受
    #[serde(alias = "homeGround")]
    #[validate(length(max = 100, message = "城市不能超过100个字符"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub city: Option<String>,
    #[validate(length(max = 255, message = "Logo 地址不能超过255个字符"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub logo_url: Option<String>,
    pub franchise_id: i64,
}

/// 更新球队请求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeamRequest {
    pub id: i64,
    pub version: Option<i32>,
    #[validate(
        length(min = 1, max = 100, message = "球队名称长度必须在1-100个字符之间"),
        custom(function = "not_blank")
    )]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[serde(alias = "homeGround")]
    #[validate(length(max = 100, message = "城市不能超过100个字符"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub city: Option<String>,
    #[validate(length(max = 255, message = "Logo 地址不能超过255个字符"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub logo_url: Option<String>,
    pub franchise_id: i64,
}

/// 创建球员请求
///
/// 姓名可直接给出 `name`，也可按投影形式给出 `firstName`/`lastName`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    #[validate(length(max = 100, message = "球员姓名不能超过100个字符"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub last_name: Option<String>,
    #[validate(range(min = 15, max = 60, message = "年龄必须在15-60之间"))]
    pub age: i32,
    #[serde(alias = "position")]
    #[validate(
        length(min = 1, max = 50, message = "场上角色长度必须在1-50个字符之间"),
        custom(function = "not_blank")
    )]
    #[serde(deserialize_with = "trimmed")]
    pub role: String,
    pub team_id: i64,
}

/// 更新球员请求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerRequest {
    pub id: i64,
    pub version: Option<i32>,
    #[validate(length(max = 100, message = "球员姓名不能超过100个字符"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub last_name: Option<String>,
    #[validate(range(min = 15, max = 60, message = "年龄必须在15-60之间"))]
    pub age: i32,
    #[serde(alias = "position")]
    #[validate(
        length(min = 1, max = 50, message = "场上角色长度必须在1-50个字符之间"),
        custom(function = "not_blank")
    )]
    #[serde(deserialize_with = "trimmed")]
    pub role: String,
    pub team_id: i64,
}

/// 创建赞助商请求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSponsorRequest {
    #[validate(
        length(min = 1, max = 100, message = "赞助商名称长度必须在1-100个字符之间"),
        custom(function = "not_blank")
    )]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[validate(length(max = 255, message = "Logo 地址不能超过255个字符"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub logo_url: Option<String>,
    pub franchise_id: i64,
}

/// 更新赞助商请求
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSponsorRequest {
    pub id: i64,
    pub version: Option<i32>,
    #[validate(
        length(min = 1, max = 100, message = "赞助商名称长度必须在1-100个字符之间"),
        custom(function = "not_blank")
    )]
    #[serde(deserialize_with = "trimmed")]
    pub name: String,
    #[validate(length(max = 255, message = "Logo 地址不能超过255个字符"))]
    #[serde(default, deserialize_with = "trimmed_opt")]
    pub logo_url: Option<String>,
    pub franchise_id: i64,
}

/// 写入时的姓名：优先 `name`，否则以单个空格拼接名与姓并去除首尾空白
pub fn resolve_player_name(
    name: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> String {
    match name {
        Some(name) => name.trim().to_string(),
        None => join_name(first_name.unwrap_or(""), last_name.unwrap_or("")),
    }
}

pub fn join_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name).trim().to_string()
}

/// 投影中的姓名拆分：完整姓名放入名，姓留空
pub fn split_name(name: &str) -> (String, String) {
    (name.to_string(), String::new())
}

impl CreatePlayerRequest {
    pub fn resolved_name(&self) -> String {
        resolve_player_name(
            self.name.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
        )
    }
}

impl UpdatePlayerRequest {
    pub fn resolved_name(&self) -> String {
        resolve_player_name(
            self.name.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
        )
    }
}

// ==================== 投影 ====================

/// 俱乐部投影
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FranchiseDto {
    pub id: i64,
    pub name: String,
    pub home_city: String,
    pub logo_url: String,
    pub team_count: i32,
    pub sponsor_count: i32,
}

impl FranchiseDto {
    pub fn from_entity(franchise: &Franchise) -> Self {
        Self {
            id: franchise.id,
            name: franchise.name.clone(),
            home_city: franchise.home_city.clone().unwrap_or_default(),
            logo_url: franchise.logo_url.clone().unwrap_or_default(),
            team_count: count(franchise.teams.as_deref()),
            sponsor_count: count(franchise.sponsors.as_deref()),
        }
    }
}

/// 球队投影
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    pub id: i64,
    pub name: String,
    pub home_ground: String,
    pub logo_url: String,
    pub franchise_id: i64,
    pub franchise_name: String,
    pub player_count: i32,
}

impl TeamDto {
    pub fn from_entity(team: &Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            home_ground: team.city.clone().unwrap_or_default(),
            logo_url: team.logo_url.clone().unwrap_or_default(),
            franchise_id: team.franchise_id,
            franchise_name: team
                .franchise
                .as_ref()
                .map_or_else(|| UNKNOWN_NAME.to_string(), |f| f.name.clone()),
            player_count: count(team.players.as_deref()),
        }
    }
}

/// 球员投影
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub position: String,
    pub age: i32,
    pub team_id: i64,
    pub team_name: String,
}

impl PlayerDto {
    /// `today` 由调用方给出，出生日期据此推算
    pub fn from_entity(player: &Player, today: NaiveDate) -> Self {
        let (first_name, last_name) = split_name(&player.name);
        Self {
            id: player.id,
            first_name,
            last_name,
            date_of_birth: derive_date_of_birth(player.age, today),
            position: player.role.clone(),
            age: player.age,
            team_id: player.team_id,
            team_name: player
                .team
                .as_ref()
                .map_or_else(|| UNKNOWN_NAME.to_string(), |t| t.name.clone()),
        }
    }
}

/// 赞助商投影
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsorDto {
    pub id: i64,
    pub name: String,
    pub logo_url: String,
    pub franchise_id: i64,
    pub franchise_name: String,
    pub team_count: i32,
}

impl SponsorDto {
    pub fn from_entity(sponsor: &Sponsor) -> Self {
        Self {
            id: sponsor.id,
            name: sponsor.name.clone(),
            logo_url: sponsor.logo_url.clone().unwrap_or_default(),
            franchise_id: sponsor.franchise_id,
            franchise_name: sponsor
                .franchise
                .as_ref()
                .map_or_else(|| UNKNOWN_NAME.to_string(), |f| f.name.clone()),
            team_count: count(sponsor.teams.as_deref()),
        }
    }
}

fn count<T>(items: Option<&[T]>) -> i32 {
    items.map_or(0, |items| i32::try_from(items.len()).unwrap_or(i32::MAX))
}

/// 由年龄推算出生日期：今天往前推 `age` 年（2 月 29 日落到 2 月 28 日）
pub fn derive_date_of_birth(age: i32, today: NaiveDate) -> NaiveDate {
    let months = u32::try_from(age).unwrap_or(0).saturating_mul(12);
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Utc};
    use fake::Fake;
    use fake::faker::name::en::{FirstName, LastName};

    fn franchise(id: i64, name: &str) -> Franchise {
        let now = Utc::now();
        Franchise {
            id,
            name: name.to_string(),
            home_city: None,
            logo_url: None,
            version: 1,
            created_at: now,
            updated_at: now,
            teams: None,
            sponsors: None,
        }
    }

    fn team(id: i64, franchise_id: i64) -> Team {
        let now = Utc::now();
        Team {
            id,
            name: "Super Kings".to_string(),
            city: Some("Chennai".to_string()),
            logo_url: None,
            franchise_id,
            version: 1,
            created_at: now,
            updated_at: now,
            franchise: None,
            players: None,
            sponsors: None,
        }
    }

    fn player(age: i32) -> Player {
        let now = Utc::now();
        Player {
            id: 1,
            name: "MS Dhoni".to_string(),
            age,
            role: "Wicket-keeper".to_string(),
            team_id: 1,
            version: 1,
            created_at: now,
            updated_at: now,
            team: None,
        }
    }

    #[test]
    fn test_franchise_counts_default_to_zero_when_not_loaded() {
        let dto = FranchiseDto::from_entity(&franchise(1, "Chennai"));
        assert_eq!(dto.team_count, 0);
        assert_eq!(dto.sponsor_count, 0);
        assert_eq!(dto.home_city, "");
        assert_eq!(dto.logo_url, "");
    }

    #[test]
    fn test_franchise_counts_loaded_collections() {
        let mut f = franchise(1, "Chennai");
        f.teams = Some(vec![team(1, 1), team(2, 1)]);
        f.sponsors = Some(vec![]);

        let dto = FranchiseDto::from_entity(&f);
        assert_eq!(dto.team_count, 2);
        assert_eq!(dto.sponsor_count, 0);
    }

    #[test]
    fn test_team_franchise_name_unknown_when_absent() {
        let dto = TeamDto::from_entity(&team(1, 7));
        assert_eq!(dto.franchise_name, UNKNOWN_NAME);
        assert_eq!(dto.home_ground, "Chennai");
        assert_eq!(dto.franchise_id, 7);
        assert_eq!(dto.player_count, 0);

        let mut t = team(1, 7);
        t.franchise = Some(Box::new(franchise(7, "Chennai")));
        assert_eq!(TeamDto::from_entity(&t).franchise_name, "Chennai");
    }

    #[test]
    fn test_player_projection_name_and_birth_year() {
        let today = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let dto = PlayerDto::from_entity(&player(25), today);

        assert_eq!(dto.first_name, "MS Dhoni");
        assert_eq!(dto.last_name, "");
        assert_eq!(dto.position, "Wicket-keeper");
        assert_eq!(dto.team_name, UNKNOWN_NAME);
        assert_eq!(dto.date_of_birth, NaiveDate::from_ymd_opt(2001, 6, 15).unwrap());
    }

    #[test]
    fn test_date_of_birth_leap_day_falls_back_to_feb_28() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            derive_date_of_birth(21, today),
            NaiveDate::from_ymd_opt(2003, 2, 28).unwrap()
        );
    }

    #[test]
    fn test_birth_year_matches_age_for_every_valid_age() {
        let today = Utc::now().date_naive();
        for age in 15..=60 {
            assert_eq!(derive_date_of_birth(age, today).year(), today.year() - age);
        }
    }

    #[test]
    fn test_name_join_on_write_and_split_on_read() {
        for _ in 0..20 {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();

            let stored = resolve_player_name(None, Some(&first), Some(&last));
            assert_eq!(stored, format!("{} {}", first, last));

            let (projected_first, projected_last) = split_name(&stored);
            assert_eq!(projected_first, stored);
            assert_eq!(projected_last, "");
        }

        assert_eq!(resolve_player_name(None, Some("Virat"), None), "Virat");
        assert_eq!(resolve_player_name(Some(" Rohit "), Some("x"), None), "Rohit");
    }

    #[test]
    fn test_request_validation_rejects_blank_name_and_bad_age() {
        let req = CreateFranchiseRequest {
            name: "   ".to_string(),
            home_city: None,
            logo_url: None,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let req = CreatePlayerRequest {
            name: Some("Young".to_string()),
            first_name: None,
            last_name: None,
            age: 14,
            role: "Bowler".to_string(),
            team_id: 1,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("age"));
    }

    #[test]
    fn test_team_request_accepts_home_ground_alias() {
        let req: CreateTeamRequest = serde_json::from_str(
            r#"{"name":"Super Kings","homeGround":"Chennai","franchiseId":1}"#,
        )
        .unwrap();
        assert_eq!(req.city.as_deref(), Some("Chennai"));
        assert!(req.logo_url.is_none());
    }

    #[test]
    fn test_length_limits_apply_to_trimmed_values() {
        let name = "a".repeat(100);
        let body = serde_json::json!({
            "name": format!("  {name}  "),
            "homeCity": " Toronto ",
        });
        let req: CreateFranchiseRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.name, name);
        assert_eq!(req.home_city.as_deref(), Some("Toronto"));
        assert!(req.validate().is_ok());

        let req: CreateSponsorRequest = serde_json::from_value(serde_json::json!({
            "name": format!(" {}", "b".repeat(101)),
            "franchiseId": 1,
        }))
        .unwrap();
        assert!(req.validate().unwrap_err().field_errors().contains_key("name"));
    }
}
