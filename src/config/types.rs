//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::SiteDefaults;
use crate::domain::site::CONVENTIONAL_DEFAULT_SITE_NAME;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 站点配置存储
    #[serde(default)]
    pub store: StoreConfig,

    /// 站点内容配置
    #[serde(default)]
    pub hosting: HostingConfig,

    /// 证书存储配置
    #[serde(default)]
    pub certificates: CertificatesConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Sqlite,
    Memory,
}

/// 站点配置存储
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// 存储后端：sqlite | memory
    #[serde(default)]
    pub backend: StoreBackend,

    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub database_path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// 记录在存储中的服务器主版本号
    #[serde(default = "default_major_version")]
    pub major_version: u32,

    /// 存储中默认站点的实际名称
    #[serde(default = "default_site_name")]
    pub default_site_name: String,

    /// 未指定时使用的应用程序池
    #[serde(default = "default_pool_name")]
    pub default_pool_name: String,

    /// 非 netcore 应用程序池的托管运行时版本
    #[serde(default = "default_legacy_runtime_version")]
    pub legacy_runtime_version: String,
}

fn default_db_path() -> String {
    "data/siteadmin.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_major_version() -> u32 {
    10
}

fn default_site_name() -> String {
    CONVENTIONAL_DEFAULT_SITE_NAME.to_string()
}

fn default_pool_name() -> String {
    "DefaultAppPool".to_string()
}

fn default_legacy_runtime_version() -> String {
    "v4.0".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_path: default_db_path(),
            max_connections: default_max_connections(),
            major_version: default_major_version(),
            default_site_name: default_site_name(),
            default_pool_name: default_pool_name(),
            legacy_runtime_version: default_legacy_runtime_version(),
        }
    }
}

impl StoreConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.database_path)
    }

    /// 站点创建与查找使用的默认值
    pub fn site_defaults(&self) -> SiteDefaults {
        SiteDefaults {
            default_site_name: self.default_site_name.clone(),
            default_pool_name: self.default_pool_name.clone(),
            legacy_runtime_version: self.legacy_runtime_version.clone(),
        }
    }
}

/// 站点内容配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostingConfig {
    /// 克隆站点时复制的内容根目录，未设置时使用进程工作目录
    #[serde(default)]
    pub content_root: Option<PathBuf>,
}

impl HostingConfig {
    pub fn content_root(&self) -> std::io::Result<PathBuf> {
        match &self.content_root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir(),
        }
    }
}

/// 证书存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct CertificatesConfig {
    /// 证书存储根目录
    #[serde(default = "default_certificates_dir")]
    pub store_dir: PathBuf,

    /// 证书导入的存储名称
    #[serde(default = "default_certificate_store_name")]
    pub store_name: String,
}

fn default_certificates_dir() -> PathBuf {
    PathBuf::from("data/certificates")
}

fn default_certificate_store_name() -> String {
    "TrustedPeople".to_string()
}

impl Default for CertificatesConfig {
    fn default() -> Self {
        Self {
            store_dir: default_certificates_dir(),
            store_name: default_certificate_store_name(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
