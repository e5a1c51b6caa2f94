//! Persistence Layer - 数据持久化
//!
//! 站点配置的 SQLite 存储实现

pub mod sqlite;

pub use self::sqlite::SqliteSiteStore;
