//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::{
    // Command handlers
    CloneSiteHandler, CreateHttpsSiteHandler, CreateSiteHandler, CreateVirtualApplicationHandler,
    RecyclePoolHandler, RemoveSiteHandler, StartPoolHandler, StartSiteHandler, StopPoolHandler,
    StopSiteHandler,
    // Query handlers
    CheckSiteExistsHandler, GetPoolStateHandler, GetServerVersionHandler, GetSiteLocationHandler,
    GetSiteStateHandler, ListSitesHandler,
    // Ports
    CertificateStorePort, ContentCopierPort, SiteDefaults, SiteStorePort,
};

/// 应用状态
pub struct AppState {
    /// 克隆站点时复制的内容根目录
    pub content_root: PathBuf,

    // ========== Command Handlers ==========
    pub start_site_handler: StartSiteHandler,
    pub stop_site_handler: StopSiteHandler,
    pub remove_site_handler: RemoveSiteHandler,
    pub create_site_handler: CreateSiteHandler,
    pub create_https_site_handler: CreateHttpsSiteHandler,
    pub create_virtual_application_handler: CreateVirtualApplicationHandler,
    pub clone_site_handler: CloneSiteHandler,
    pub start_pool_handler: StartPoolHandler,
    pub stop_pool_handler: StopPoolHandler,
    pub recycle_pool_handler: RecyclePoolHandler,

    // ========== Query Handlers ==========
    pub list_sites_handler: ListSitesHandler,
    pub check_site_exists_handler: CheckSiteExistsHandler,
    pub get_site_location_handler: GetSiteLocationHandler,
    pub get_site_state_handler: GetSiteStateHandler,
    pub get_pool_state_handler: GetPoolStateHandler,
    pub get_server_version_handler: GetServerVersionHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        store: Arc<dyn SiteStorePort>,
        certificates: Arc<dyn CertificateStorePort>,
        copier: Arc<dyn ContentCopierPort>,
        defaults: SiteDefaults,
        content_root: PathBuf,
    ) -> Self {
        Self {
            content_root,

            // Command handlers
            start_site_handler: StartSiteHandler::new(store.clone()),
            stop_site_handler: StopSiteHandler::new(store.clone()),
            remove_site_handler: RemoveSiteHandler::new(store.clone()),
            create_site_handler: CreateSiteHandler::new(store.clone(), defaults.clone()),
            create_https_site_handler: CreateHttpsSiteHandler::new(
                store.clone(),
                certificates,
                defaults.clone(),
            ),
            create_virtual_application_handler: CreateVirtualApplicationHandler::new(
                store.clone(),
                defaults.clone(),
            ),
            clone_site_handler: CloneSiteHandler::new(store.clone(), copier, defaults.clone()),
            start_pool_handler: StartPoolHandler::new(store.clone()),
            stop_pool_handler: StopPoolHandler::new(store.clone()),
            recycle_pool_handler: RecyclePoolHandler::new(store.clone()),

            // Query handlers
            list_sites_handler: ListSitesHandler::new(store.clone()),
            check_site_exists_handler: CheckSiteExistsHandler::new(
                store.clone(),
                defaults.clone(),
            ),
            get_site_location_handler: GetSiteLocationHandler::new(store.clone(), defaults),
            get_site_state_handler: GetSiteStateHandler::new(store.clone()),
            get_pool_state_handler: GetPoolStateHandler::new(store.clone()),
            get_server_version_handler: GetServerVersionHandler::new(store),
        }
    }
}
