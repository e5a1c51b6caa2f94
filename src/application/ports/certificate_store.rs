//! Certificate Store Port - 出站端口
//!
//! 把证书文件导入机器级证书存储

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// 证书存储错误
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("Certificate file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),

    #[error("Unsupported certificate format: {0}")]
    UnsupportedFormat(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// 已导入的证书
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedCertificate {
    /// SHA-1 指纹（大写十六进制）
    pub hash: String,
    /// 证书所在存储名称
    pub store_name: String,
    pub subject: String,
}

/// Certificate Store Port
#[async_trait]
pub trait CertificateStorePort: Send + Sync {
    /// 导入证书文件，`password` 仅用于 PKCS#12 包
    async fn import(
        &self,
        certificate_path: &Path,
        password: &str,
    ) -> Result<ImportedCertificate, CertificateError>;
}
