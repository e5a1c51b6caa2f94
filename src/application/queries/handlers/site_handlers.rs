//! Site Query Handlers

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::defaults::SiteDefaults;
use crate::application::error::ApplicationError;
use crate::application::ports::SiteStorePort;
use crate::application::queries::{
    CheckSiteExists, GetSiteLocation, GetSiteState, ListSites, ObjectStatus, Presence,
};
use crate::application::session::StoreSession;
use crate::domain::site::{is_default_site_name, normalize_application_path, ObjectState, Site};

// ============================================================================
// Response DTOs
// ============================================================================

/// 站点摘要
#[derive(Debug, Clone)]
pub struct SiteSummary {
    pub id: i64,
    pub name: String,
    pub bindings: Vec<String>,
    pub physical_path: Option<PathBuf>,
    pub state: ObjectState,
}

impl From<&Site> for SiteSummary {
    fn from(site: &Site) -> Self {
        Self {
            id: site.id,
            name: site.name.clone(),
            bindings: site.binding_informations(),
            physical_path: site.primary_physical_path().map(Path::to_path_buf),
            state: site.state,
        }
    }
}

/// 站点及应用的存在性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteExistence {
    pub site: Presence,
    pub application: Presence,
}

/// 站点应用位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLocation {
    pub physical_path: PathBuf,
    pub site_name: String,
    pub application_pool: String,
}

/// 约定的默认站点名映射为存储中默认站点的实际名称
fn resolve_site_name(name: &str, defaults: &SiteDefaults) -> String {
    let name = name.trim();
    if is_default_site_name(name) {
        defaults.default_site_name.clone()
    } else {
        name.to_string()
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// ListSites Handler
pub struct ListSitesHandler {
    store: Arc<dyn SiteStorePort>,
}

impl ListSitesHandler {
    pub fn new(store: Arc<dyn SiteStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, _query: ListSites) -> Result<Vec<SiteSummary>, ApplicationError> {
        let session = StoreSession::open(self.store.clone()).await?;
        Ok(session.sites().iter().map(SiteSummary::from).collect())
    }
}

/// CheckSiteExists Handler
///
/// 存储读取失败时返回 `Indeterminate`；名称有歧义时返回错误。
pub struct CheckSiteExistsHandler {
    store: Arc<dyn SiteStorePort>,
    defaults: SiteDefaults,
}

impl CheckSiteExistsHandler {
    pub fn new(store: Arc<dyn SiteStorePort>, defaults: SiteDefaults) -> Self {
        Self { store, defaults }
    }

    pub async fn handle(&self, query: CheckSiteExists) -> Result<SiteExistence, ApplicationError> {
        let site_name = resolve_site_name(&query.site_name, &self.defaults);
        let application_path = normalize_application_path(&query.application_path);

        let session = match StoreSession::open(self.store.clone()).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(site = %site_name, error = %e, "Site existence is indeterminate");
                return Ok(SiteExistence {
                    site: Presence::Indeterminate,
                    application: Presence::Indeterminate,
                });
            }
        };

        let existence = match session.find_site(&site_name)? {
            Some(site) => SiteExistence {
                site: Presence::Present,
                application: Presence::from_found(
                    site.find_application(&application_path).is_some(),
                ),
            },
            None => SiteExistence {
                site: Presence::Absent,
                application: Presence::Absent,
            },
        };

        Ok(existence)
    }
}

/// GetSiteLocation Handler
pub struct GetSiteLocationHandler {
    store: Arc<dyn SiteStorePort>,
    defaults: SiteDefaults,
}

impl GetSiteLocationHandler {
    pub fn new(store: Arc<dyn SiteStorePort>, defaults: SiteDefaults) -> Self {
        Self { store, defaults }
    }

    pub async fn handle(
        &self,
        query: GetSiteLocation,
    ) -> Result<Option<SiteLocation>, ApplicationError> {
        let site_name = resolve_site_name(&query.site_name, &self.defaults);
        let application_path = normalize_application_path(&query.application_path);

        let session = StoreSession::open(self.store.clone()).await?;

        let Some(site) = session.find_site(&site_name)? else {
            return Ok(None);
        };
        let Some(application) = site.find_application(&application_path) else {
            return Ok(None);
        };
        let Some(root) = application.root_virtual_directory() else {
            tracing::warn!(
                site = %site.name,
                path = %application.path,
                "Application has no root virtual directory"
            );
            return Ok(None);
        };

        Ok(Some(SiteLocation {
            physical_path: root.physical_path.clone(),
            site_name: site.name.clone(),
            application_pool: application.application_pool_name.clone(),
        }))
    }
}

/// GetSiteState Handler
pub struct GetSiteStateHandler {
    store: Arc<dyn SiteStorePort>,
}

impl GetSiteStateHandler {
    pub fn new(store: Arc<dyn SiteStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetSiteState) -> Result<ObjectStatus, ApplicationError> {
        let session = match StoreSession::open(self.store.clone()).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(site = %query.site_name, error = %e, "Site state is indeterminate");
                return Ok(ObjectStatus::indeterminate());
            }
        };

        Ok(match session.find_site(query.site_name.trim())? {
            Some(site) => ObjectStatus {
                presence: Presence::Present,
                state: Some(site.state),
            },
            None => ObjectStatus::absent(),
        })
    }
}
