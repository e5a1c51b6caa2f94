//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod pool_commands;
mod site_commands;

pub mod handlers;

pub use pool_commands::*;
pub use site_commands::*;
