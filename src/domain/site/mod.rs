//! Site Context - 站点限界上下文
//!
//! 职责:
//! - 站点、应用、虚拟目录、应用程序池实体
//! - 配置快照聚合（一次会话内的全部修改）
//! - 名称匹配与绑定规则

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::{Application, ApplicationPool, ServerConfiguration, Site, VirtualDirectory};
pub use errors::SiteError;
pub use value_objects::{
    is_default_site_name, names_match, normalize_application_path, Binding, BindingInformation,
    CertificateBinding, ObjectState, PipelineMode, Protocol, SiteName,
    CONVENTIONAL_DEFAULT_SITE_NAME,
};
