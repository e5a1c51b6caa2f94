//! HTTP Handlers

mod ping;
mod pool;
mod server;
mod site;

pub use ping::*;
pub use pool::*;
pub use server::*;
pub use site::*;
