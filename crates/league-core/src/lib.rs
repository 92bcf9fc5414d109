//! 板球联赛核心库
//!
//! 提供俱乐部、球队、球员、赞助商的实体模型、存储网关与实体操作。
//!
//! ## 模块结构
//!
//! - `models`: 实体模型与关联关系选择器
//! - `error`: 错误类型定义
//! - `repository`: 存储网关（PostgreSQL 与进程内实现）
//! - `service`: 实体操作与传输投影（DTO）
//!
//! ## 数据关系
//!
//! ```text
//! Franchise 1 ── * Team 1 ── * Player
//!     │              │
//!     1              * (team_sponsors)
//!     │              │
//!     * ─── Sponsor ─*
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use error::{LeagueError, Result};
pub use models::*;
pub use repository::{LeagueStore, MemoryLeagueStore, PgLeagueStore};
pub use service::{FranchiseService, PlayerService, SponsorService, TeamService, dto};
