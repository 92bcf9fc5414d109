//! 存储网关
//!
//! 提供所有实体的数据访问接口，封装 SQL 操作细节。
//!
//! ## 设计原则
//!
//! - 仓储只负责数据持久化与关联预加载，不包含业务校验
//! - 使用 SQLx 进行数据库操作，外键与唯一约束作为最后防线
//! - 乐观并发控制由仓储通过 version 列完成
//! - 定义 trait 接口以支持 mock 测试，并提供进程内实现

mod franchise_repo;
mod memory_store;
mod pg_store;
mod player_repo;
mod sponsor_repo;
mod team_repo;
mod traits;

pub use memory_store::MemoryLeagueStore;
pub use pg_store::PgLeagueStore;
pub use traits::*;
