//! Site Commands

use std::path::PathBuf;

/// 启动站点命令
#[derive(Debug, Clone)]
pub struct StartSite {
    pub site_name: String,
}

/// 停止站点命令
#[derive(Debug, Clone)]
pub struct StopSite {
    pub site_name: String,
}

/// 删除站点命令（同时删除同名应用程序池）
#[derive(Debug, Clone)]
pub struct RemoveSite {
    pub site_name: String,
}

/// 创建 HTTP 站点命令，绑定 `*:{port}:`
#[derive(Debug, Clone)]
pub struct CreateSite {
    pub site_name: String,
    pub physical_path: PathBuf,
    pub port: u16,
    pub net_core: bool,
}

/// 创建 HTTPS 站点命令，绑定 `*:443:{host_name}`
#[derive(Debug, Clone)]
pub struct CreateHttpsSite {
    pub site_name: String,
    pub physical_path: PathBuf,
    pub host_name: String,
    pub certificate_path: PathBuf,
    pub certificate_password: String,
    pub pool_name: Option<String>,
    pub net_core: bool,
}

/// 在已有站点下创建应用（虚拟站点）
#[derive(Debug, Clone)]
pub struct CreateVirtualApplication {
    pub site_name: String,
    pub virtual_path: String,
    pub physical_path: PathBuf,
    pub pool_name: Option<String>,
    pub net_core: bool,
}

/// 复制当前内容目录并以此创建新站点
#[derive(Debug, Clone)]
pub struct CloneSite {
    pub site_name: String,
    pub port: u16,
    pub content_root: PathBuf,
}
