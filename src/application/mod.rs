//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SiteStore、CertificateStore、ContentCopier）
//! - session: 存储会话（读取快照 -> 修改 -> 提交）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod defaults;
pub mod error;
pub mod ports;
pub mod queries;
pub mod session;

// Re-exports
pub use commands::{
    // Site commands
    CloneSite,
    CreateHttpsSite,
    CreateSite,
    CreateVirtualApplication,
    RemoveSite,
    StartSite,
    StopSite,
    // Pool commands
    RecyclePool,
    StartPool,
    StopPool,
    // Handlers
    handlers::{
        CloneSiteHandler, ClonedSite, CreateHttpsSiteHandler, CreateSiteHandler,
        CreateVirtualApplicationHandler, CreatedApplication, CreatedSite, RecyclePoolHandler,
        RemoveSiteHandler, RemoveSiteResponse, StartPoolHandler, StartSiteHandler,
        StopPoolHandler, StopSiteHandler,
    },
};

pub use defaults::SiteDefaults;
pub use error::ApplicationError;
pub use session::StoreSession;

pub use ports::{
    CertificateError, CertificateStorePort, ContentCopierPort, CopyError, CopyStats,
    ImportedCertificate, SiteStorePort, StoreError,
};

pub use queries::{
    CheckSiteExists,
    GetPoolState,
    GetServerVersion,
    GetSiteLocation,
    GetSiteState,
    ListSites,
    ObjectStatus,
    Presence,
    // Handlers
    handlers::{
        CheckSiteExistsHandler, GetPoolStateHandler, GetServerVersionHandler,
        GetSiteLocationHandler, GetSiteStateHandler, ListSitesHandler, SiteExistence,
        SiteLocation, SiteSummary,
    },
};
