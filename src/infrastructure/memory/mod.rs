//! Memory Layer - In-Memory State Management
//!
//! 进程内的站点存储实现，用于测试和演示

mod site_store;

pub use site_store::InMemorySiteStore;
