//! siteadmin - 站点与应用程序池管理服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Site Context: 站点、绑定、应用、虚拟目录、应用程序池
//! - 目录名整理
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SiteStore, CertificateStore, ContentCopier）
//! - Session: 读取快照 -> 修改 -> 提交
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: `/IIS/*` 管理接口
//! - Persistence: SQLite 存储
//! - Memory: 内存存储
//! - Adapters: 证书存储、内容复制

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
