//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod pool_queries;
mod presence;
mod server_queries;
mod site_queries;

pub mod handlers;

pub use pool_queries::*;
pub use presence::{ObjectStatus, Presence};
pub use server_queries::*;
pub use site_queries::*;
