//! Site HTTP Handlers

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::{
    CheckSiteExists, CloneSite, CreateHttpsSite, CreateSite, CreateVirtualApplication,
    GetSiteLocation, GetSiteState, ListSites, Presence, RemoveSite, StartSite, StopSite,
};
use crate::infrastructure::http::dto::{
    ApiResponse, CreatedSiteDto, Empty, ObjectStatusDto, SiteDto,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteNameParams {
    pub site_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteApplicationParams {
    pub site_name: String,
    #[serde(default)]
    pub application: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebSiteParams {
    pub site_name: String,
    pub path: PathBuf,
    pub port: u16,
    pub net_core: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHttpsWebSiteParams {
    pub site_name: String,
    pub path: PathBuf,
    pub host_name: String,
    pub certificate_path: PathBuf,
    #[serde(default)]
    pub certificate_password: String,
    pub pool_name: Option<String>,
    pub net_core: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVirtualSiteParams {
    pub site_name: String,
    pub virtual_path: String,
    pub path: PathBuf,
    pub pool_name: Option<String>,
    pub net_core: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneWebSiteParams {
    pub site_name: String,
    pub port: u16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveSiteDto {
    pub site_removed: bool,
    pub pool_removed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClonedSiteDto {
    pub site: CreatedSiteDto,
    pub files_copied: u64,
    pub bytes_copied: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreatedApplicationDto {
    pub site_name: String,
    pub path: String,
    pub physical_path: String,
    pub application_pool: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiteExistenceDto {
    pub site: Presence,
    pub application: Presence,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SiteLocationDto {
    pub physical_path: String,
    pub site_name: String,
    pub application_pool: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// 列出所有站点
pub async fn list_sites(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<SiteDto>>>, ApiError> {
    let sites = state.list_sites_handler.handle(ListSites).await?;
    Ok(Json(ApiResponse::success(
        sites.into_iter().map(SiteDto::from).collect(),
    )))
}

/// 启动站点
pub async fn start_site(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SiteNameParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let Query(params) = params?;
    state
        .start_site_handler
        .handle(StartSite {
            site_name: params.site_name,
        })
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// 停止站点
pub async fn stop_site(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SiteNameParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let Query(params) = params?;
    state
        .stop_site_handler
        .handle(StopSite {
            site_name: params.site_name,
        })
        .await?;
    Ok(Json(ApiResponse::ok()))
}

/// 删除站点及同名应用程序池，站点不存在时同样成功
pub async fn remove_site(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SiteNameParams>, QueryRejection>,
) -> Result<Json<ApiResponse<RemoveSiteDto>>, ApiError> {
    let Query(params) = params?;
    let removed = state
        .remove_site_handler
        .handle(RemoveSite {
            site_name: params.site_name,
        })
        .await?;
    Ok(Json(ApiResponse::success(RemoveSiteDto {
        site_removed: removed.site_removed,
        pool_removed: removed.pool_removed,
    })))
}

/// 创建 HTTP 站点
pub async fn create_site(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CreateWebSiteParams>, QueryRejection>,
) -> Result<Json<ApiResponse<CreatedSiteDto>>, ApiError> {
    let Query(params) = params?;
    let created = state
        .create_site_handler
        .handle(CreateSite {
            site_name: params.site_name,
            physical_path: params.path,
            port: params.port,
            net_core: params.net_core.unwrap_or(true),
        })
        .await?;
    Ok(Json(ApiResponse::success(created.into())))
}

/// 创建 HTTPS 站点
pub async fn create_https_site(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CreateHttpsWebSiteParams>, QueryRejection>,
) -> Result<Json<ApiResponse<CreatedSiteDto>>, ApiError> {
    let Query(params) = params?;
    let created = state
        .create_https_site_handler
        .handle(CreateHttpsSite {
            site_name: params.site_name,
            physical_path: params.path,
            host_name: params.host_name,
            certificate_path: params.certificate_path,
            certificate_password: params.certificate_password,
            pool_name: params.pool_name,
            net_core: params.net_core.unwrap_or(true),
        })
        .await?;
    Ok(Json(ApiResponse::success(created.into())))
}

/// 在已有站点下创建应用
pub async fn create_virtual_site(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CreateVirtualSiteParams>, QueryRejection>,
) -> Result<Json<ApiResponse<CreatedApplicationDto>>, ApiError> {
    let Query(params) = params?;
    let created = state
        .create_virtual_application_handler
        .handle(CreateVirtualApplication {
            site_name: params.site_name,
            virtual_path: params.virtual_path,
            physical_path: params.path,
            pool_name: params.pool_name,
            net_core: params.net_core.unwrap_or(true),
        })
        .await?;
    Ok(Json(ApiResponse::success(CreatedApplicationDto {
        site_name: created.site_name,
        path: created.path,
        physical_path: created.physical_path.to_string_lossy().to_string(),
        application_pool: created.application_pool,
    })))
}

/// 复制当前内容根目录并创建站点
pub async fn clone_site(
    State(state): State<Arc<AppState>>,
    params: Result<Query<CloneWebSiteParams>, QueryRejection>,
) -> Result<Json<ApiResponse<ClonedSiteDto>>, ApiError> {
    let Query(params) = params?;
    let cloned = state
        .clone_site_handler
        .handle(CloneSite {
            site_name: params.site_name,
            port: params.port,
            content_root: state.content_root.clone(),
        })
        .await?;
    Ok(Json(ApiResponse::success(ClonedSiteDto {
        site: cloned.site.into(),
        files_copied: cloned.files_copied,
        bytes_copied: cloned.bytes_copied,
    })))
}

/// 站点及应用是否存在
pub async fn is_site_exist(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SiteApplicationParams>, QueryRejection>,
) -> Result<Json<ApiResponse<SiteExistenceDto>>, ApiError> {
    let Query(params) = params?;
    let existence = state
        .check_site_exists_handler
        .handle(CheckSiteExists {
            site_name: params.site_name,
            application_path: params.application,
        })
        .await?;
    Ok(Json(ApiResponse::success(SiteExistenceDto {
        site: existence.site,
        application: existence.application,
    })))
}

/// 站点应用的物理路径，不存在时 data 为 null
pub async fn get_site_location(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SiteApplicationParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Option<SiteLocationDto>>>, ApiError> {
    let Query(params) = params?;
    let location = state
        .get_site_location_handler
        .handle(GetSiteLocation {
            site_name: params.site_name,
            application_path: params.application,
        })
        .await?;
    Ok(Json(ApiResponse::success(location.map(|l| SiteLocationDto {
        physical_path: l.physical_path.to_string_lossy().to_string(),
        site_name: l.site_name,
        application_pool: l.application_pool,
    }))))
}

/// 站点存在性与运行状态
pub async fn get_site_state(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SiteNameParams>, QueryRejection>,
) -> Result<Json<ApiResponse<ObjectStatusDto>>, ApiError> {
    let Query(params) = params?;
    let status = state
        .get_site_state_handler
        .handle(GetSiteState {
            site_name: params.site_name,
        })
        .await?;
    Ok(Json(ApiResponse::success(status.into())))
}
