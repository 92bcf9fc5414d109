//! 领域模型定义
//!
//! 持久化实体与可选的关联数据。关联字段仅在存储网关按需加载时填充，
//! `None` 表示未加载，而非"没有关联数据"。

mod franchise;
mod player;
mod sponsor;
mod team;

pub use franchise::{Franchise, FranchiseRelation, NewFranchise};
pub use player::{NewPlayer, Player, PlayerRelation};
pub use sponsor::{NewSponsor, Sponsor, SponsorRelation};
pub use team::{NewTeam, Team, TeamRelation, TeamSponsor};
