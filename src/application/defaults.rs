//! 站点管理默认值

use crate::domain::site::CONVENTIONAL_DEFAULT_SITE_NAME;

/// 站点/应用程序池创建与查找时使用的默认值
#[derive(Debug, Clone)]
pub struct SiteDefaults {
    /// 存储中默认站点的实际名称
    pub default_site_name: String,
    /// 未指定应用程序池时使用的池名称
    pub default_pool_name: String,
    /// 非 netcore 应用程序池的托管运行时版本
    pub legacy_runtime_version: String,
}

impl Default for SiteDefaults {
    fn default() -> Self {
        Self {
            default_site_name: CONVENTIONAL_DEFAULT_SITE_NAME.to_string(),
            default_pool_name: "DefaultAppPool".to_string(),
            legacy_runtime_version: "v4.0".to_string(),
        }
    }
}

impl SiteDefaults {
    /// 应用程序池的托管运行时版本，netcore 应用不使用托管运行时
    pub fn runtime_version(&self, net_core: bool) -> Option<String> {
        if net_core {
            None
        } else {
            Some(self.legacy_runtime_version.clone())
        }
    }
}
