//! Data Transfer Objects

use serde::Serialize;

use crate::application::{CreatedSite, ObjectStatus, SiteSummary};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// Site DTOs
// ============================================================================

/// 站点列表项
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiteDto {
    pub site_name: String,
    pub ports: Vec<String>,
    pub path: String,
    pub state: &'static str,
}

impl From<SiteSummary> for SiteDto {
    fn from(summary: SiteSummary) -> Self {
        Self {
            site_name: summary.name,
            ports: summary.bindings,
            path: summary
                .physical_path
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            state: summary.state.as_str(),
        }
    }
}

/// 新建站点
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatedSiteDto {
    pub id: i64,
    pub site_name: String,
    pub ports: Vec<String>,
    pub path: String,
    pub application_pool: String,
    pub pool_created: bool,
    pub state: &'static str,
}

impl From<CreatedSite> for CreatedSiteDto {
    fn from(site: CreatedSite) -> Self {
        Self {
            id: site.id,
            site_name: site.name,
            ports: site.bindings,
            path: site.physical_path.to_string_lossy().to_string(),
            application_pool: site.application_pool,
            pool_created: site.pool_created,
            state: site.state.as_str(),
        }
    }
}

/// 存在性与运行状态
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectStatusDto {
    pub presence: crate::application::Presence,
    pub state: Option<&'static str>,
}

impl From<ObjectStatus> for ObjectStatusDto {
    fn from(status: ObjectStatus) -> Self {
        Self {
            presence: status.presence,
            state: status.state.map(|s| s.as_str()),
        }
    }
}
