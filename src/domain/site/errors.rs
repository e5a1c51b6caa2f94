//! Site Context - Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteError {
    #[error("无效的站点名称: {0}")]
    InvalidName(String),

    #[error("无效的绑定信息: {0}")]
    InvalidBinding(String),

    #[error("无效的路径: {0}")]
    InvalidPath(String),

    #[error("站点已存在: {0}")]
    SiteAlreadyExists(String),

    #[error("应用程序池已存在: {0}")]
    PoolAlreadyExists(String),

    #[error("应用已存在: {site}{path}")]
    ApplicationAlreadyExists { site: String, path: String },

    #[error("站点不存在: {0}")]
    SiteNotFound(String),

    #[error("应用程序池不存在: {0}")]
    PoolNotFound(String),

    #[error("按名称 {name} 查找站点，但找到 {count} 个")]
    AmbiguousSiteName { name: String, count: usize },

    #[error("绑定 {binding} 已被站点 {site} 占用")]
    BindingInUse { binding: String, site: String },

    #[error("状态无效: {0}")]
    InvalidState(String),
}
