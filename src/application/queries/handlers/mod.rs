//! Query Handlers 实现

mod pool_handlers;
mod server_handlers;
mod site_handlers;

pub use pool_handlers::*;
pub use server_handlers::*;
pub use site_handlers::*;
