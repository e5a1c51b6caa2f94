//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod pool_handlers;
mod site_handlers;

pub use pool_handlers::*;
pub use site_handlers::*;
