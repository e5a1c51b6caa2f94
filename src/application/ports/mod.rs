//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod certificate_store;
mod content_copier;
mod site_store;

pub use certificate_store::{CertificateError, CertificateStorePort, ImportedCertificate};
pub use content_copier::{ContentCopierPort, CopyError, CopyStats};
pub use site_store::{SiteStorePort, StoreError};
