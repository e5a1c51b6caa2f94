//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod certificate;
pub mod storage;

pub use certificate::FileCertificateStore;
pub use storage::FsContentCopier;
