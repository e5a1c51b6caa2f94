//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod site_store;

pub use database::*;
pub use site_store::SqliteSiteStore;
