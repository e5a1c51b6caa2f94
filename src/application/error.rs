//! 应用层错误定义
//!
//! 统一的命令/查询错误类型，按错误种类区分，HTTP 层据此选择状态码

use thiserror::Error;

use crate::application::ports::{CertificateError, CopyError, StoreError};
use crate::domain::site::SiteError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {name}")]
    NotFound {
        resource_type: &'static str,
        name: String,
    },

    /// 名称冲突、绑定冲突、并发修改
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 权限不足
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// 暂时性失败，可重试
    #[error("Transient failure: {0}")]
    Transient(String),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            name: name.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<SiteError> for ApplicationError {
    fn from(err: SiteError) -> Self {
        match err {
            SiteError::SiteNotFound(name) => Self::not_found("Site", name),
            SiteError::PoolNotFound(name) => Self::not_found("ApplicationPool", name),
            SiteError::InvalidName(_) | SiteError::InvalidBinding(_) | SiteError::InvalidPath(_) => {
                Self::ValidationError(err.to_string())
            }
            SiteError::SiteAlreadyExists(_)
            | SiteError::PoolAlreadyExists(_)
            | SiteError::ApplicationAlreadyExists { .. }
            | SiteError::AmbiguousSiteName { .. }
            | SiteError::BindingInUse { .. } => Self::Conflict(err.to_string()),
            SiteError::InvalidState(_) => Self::InvalidState(err.to_string()),
        }
    }
}

impl From<StoreError> for ApplicationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) => Self::not_found("Store entity", name),
            StoreError::Conflict(_) => Self::Conflict(err.to_string()),
            StoreError::PermissionDenied(_) => Self::PermissionDenied(err.to_string()),
            StoreError::Unavailable(_) => Self::Transient(err.to_string()),
            StoreError::Io(_) | StoreError::Database(_) | StoreError::Corrupted(_) => {
                Self::InternalError(err.to_string())
            }
        }
    }
}

impl From<CertificateError> for ApplicationError {
    fn from(err: CertificateError) -> Self {
        match err {
            CertificateError::FileNotFound(path) => Self::not_found("Certificate file", path),
            CertificateError::InvalidCertificate(_) | CertificateError::UnsupportedFormat(_) => {
                Self::ValidationError(err.to_string())
            }
            CertificateError::PermissionDenied(_) => Self::PermissionDenied(err.to_string()),
            CertificateError::Io(_) => Self::InternalError(err.to_string()),
        }
    }
}

impl From<CopyError> for ApplicationError {
    fn from(err: CopyError) -> Self {
        match err {
            CopyError::SourceNotFound(path) => Self::not_found("Content directory", path),
            CopyError::DestinationExists(_) => Self::Conflict(err.to_string()),
            CopyError::PermissionDenied(_) => Self::PermissionDenied(err.to_string()),
            CopyError::Io(_) => Self::InternalError(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_site_error_kinds() {
        assert!(matches!(
            ApplicationError::from(SiteError::SiteNotFound("a".into())),
            ApplicationError::NotFound { resource_type: "Site", .. }
        ));
        assert!(matches!(
            ApplicationError::from(SiteError::AmbiguousSiteName { name: "a".into(), count: 2 }),
            ApplicationError::Conflict(_)
        ));
        assert!(matches!(
            ApplicationError::from(SiteError::InvalidBinding("x".into())),
            ApplicationError::ValidationError(_)
        ));
    }

    #[test]
    fn test_store_error_kinds() {
        assert!(matches!(
            ApplicationError::from(StoreError::Unavailable("busy".into())),
            ApplicationError::Transient(_)
        ));
        assert!(matches!(
            ApplicationError::from(StoreError::PermissionDenied("ro".into())),
            ApplicationError::PermissionDenied(_)
        ));
        assert!(matches!(
            ApplicationError::from(StoreError::Conflict("rev".into())),
            ApplicationError::Conflict(_)
        ));
    }
}
