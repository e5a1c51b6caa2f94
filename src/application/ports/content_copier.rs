//! Content Copier Port - 出站端口
//!
//! 站点内容目录的递归复制与删除

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 复制错误
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("Source directory not found: {0}")]
    SourceNotFound(String),

    #[error("Destination already exists: {0}")]
    DestinationExists(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// 复制统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub directories: u64,
    pub files: u64,
    pub bytes: u64,
}

/// Content Copier Port
#[async_trait]
pub trait ContentCopierPort: Send + Sync {
    /// 递归复制目录，目标目录必须不存在
    async fn copy_tree(&self, from: &Path, to: &Path) -> Result<CopyStats, CopyError>;

    /// 删除目录树，不存在时直接返回
    async fn remove_tree(&self, path: &Path) -> Result<(), CopyError>;
}
