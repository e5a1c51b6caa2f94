//! Site Store Port - 出站端口
//!
//! 站点配置存储的抽象接口。存储以快照为单位读写：
//! 读取完整配置 -> 在快照上修改 -> 整体提交。

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::site::ServerConfiguration;

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// 快照读取后存储已被其他会话修改
    #[error("Store conflict: {0}")]
    Conflict(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// 暂时不可用（数据库忙、连接池超时等），可重试
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupted store data: {0}")]
    Corrupted(String),
}

/// Site Store Port
#[async_trait]
pub trait SiteStorePort: Send + Sync {
    /// 读取完整配置快照
    async fn load(&self) -> Result<ServerConfiguration, StoreError>;

    /// 提交快照，返回新的版本号
    ///
    /// 快照版本号与存储当前版本号不一致时返回 `StoreError::Conflict`。
    async fn commit(&self, configuration: ServerConfiguration) -> Result<u64, StoreError>;

    /// 服务器主版本号
    async fn major_version(&self) -> Result<u32, StoreError>;
}
