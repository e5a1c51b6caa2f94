//! Site Queries

/// 列出所有站点查询
#[derive(Debug, Clone)]
pub struct ListSites;

/// 检查站点及其应用是否存在
#[derive(Debug, Clone)]
pub struct CheckSiteExists {
    pub site_name: String,
    /// 应用路径，空串表示根应用 `/`
    pub application_path: String,
}

/// 查询站点应用的物理路径、站点名和应用程序池
#[derive(Debug, Clone)]
pub struct GetSiteLocation {
    pub site_name: String,
    pub application_path: String,
}

/// 查询站点状态
#[derive(Debug, Clone)]
pub struct GetSiteState {
    pub site_name: String,
}
