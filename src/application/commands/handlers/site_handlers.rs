//! Site Command Handlers

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::commands::{
    CloneSite, CreateHttpsSite, CreateSite, CreateVirtualApplication, RemoveSite, StartSite,
    StopSite,
};
use crate::application::defaults::SiteDefaults;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    CertificateStorePort, ContentCopierPort, CopyError, SiteStorePort,
};
use crate::application::session::StoreSession;
use crate::domain::site::{
    names_match, Binding, BindingInformation, CertificateBinding, ObjectState,
    ServerConfiguration, Site, SiteError, SiteName,
};

// ============================================================================
// Shared
// ============================================================================

/// 站点创建结果
#[derive(Debug, Clone)]
pub struct CreatedSite {
    pub id: i64,
    pub name: String,
    pub bindings: Vec<String>,
    pub physical_path: PathBuf,
    pub application_pool: String,
    /// 应用程序池是否为本次新建
    pub pool_created: bool,
    pub state: ObjectState,
}

impl CreatedSite {
    fn from_site(site: &Site, pool_created: bool) -> Self {
        Self {
            id: site.id,
            name: site.name.clone(),
            bindings: site.binding_informations(),
            physical_path: site
                .primary_physical_path()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            application_pool: site.default_application_pool.clone(),
            pool_created,
            state: site.state,
        }
    }
}

fn validate_physical_path(path: &Path) -> Result<(), ApplicationError> {
    if path.as_os_str().is_empty() {
        return Err(ApplicationError::validation("Physical path cannot be empty"));
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 不存在时按名称创建应用程序池，返回是否新建
fn provision_pool(
    configuration: &mut ServerConfiguration,
    pool_name: &str,
    net_core: bool,
    defaults: &SiteDefaults,
) -> Result<bool, ApplicationError> {
    let created = configuration.ensure_pool(pool_name, defaults.runtime_version(net_core))?;
    if created {
        tracing::info!(pool = %pool_name, net_core, "Application pool created");
    }
    Ok(created)
}

/// 新增站点并绑定应用程序池，一次提交
async fn install_site(
    store: Arc<dyn SiteStorePort>,
    defaults: &SiteDefaults,
    name: &SiteName,
    binding: Binding,
    physical_path: &Path,
    pool_name: &str,
    net_core: bool,
) -> Result<CreatedSite, ApplicationError> {
    let mut session = StoreSession::open(store).await?;

    let pool_created = provision_pool(&mut session, pool_name, net_core, defaults)?;
    let site = session.add_site(name.as_str(), binding, physical_path)?;
    site.assign_application_pool(pool_name);
    let created = CreatedSite::from_site(site, pool_created);

    session.commit().await?;

    tracing::info!(
        site = %created.name,
        site_id = created.id,
        bindings = ?created.bindings,
        pool = %created.application_pool,
        "Site created"
    );

    Ok(created)
}

// ============================================================================
// StartSite / StopSite
// ============================================================================

/// StartSite Handler
pub struct StartSiteHandler {
    store: Arc<dyn SiteStorePort>,
}

impl StartSiteHandler {
    pub fn new(store: Arc<dyn SiteStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, command: StartSite) -> Result<(), ApplicationError> {
        let mut session = StoreSession::open(self.store.clone()).await?;
        session.start_site(&command.site_name)?;
        session.commit().await?;

        tracing::info!(site = %command.site_name, "Site started");
        Ok(())
    }
}

/// StopSite Handler
pub struct StopSiteHandler {
    store: Arc<dyn SiteStorePort>,
}

impl StopSiteHandler {
    pub fn new(store: Arc<dyn SiteStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, command: StopSite) -> Result<(), ApplicationError> {
        let mut session = StoreSession::open(self.store.clone()).await?;
        session.stop_site(&command.site_name)?;
        session.commit().await?;

        tracing::info!(site = %command.site_name, "Site stopped");
        Ok(())
    }
}

// ============================================================================
// RemoveSite
// ============================================================================

/// 删除站点响应
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveSiteResponse {
    pub site_removed: bool,
    pub pool_removed: bool,
}

/// RemoveSite Handler
///
/// 站点不存在时视为成功。同名应用程序池仍被其他应用使用时保留。
pub struct RemoveSiteHandler {
    store: Arc<dyn SiteStorePort>,
}

impl RemoveSiteHandler {
    pub fn new(store: Arc<dyn SiteStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, command: RemoveSite) -> Result<RemoveSiteResponse, ApplicationError> {
        let name = command.site_name.trim();
        let mut session = StoreSession::open(self.store.clone()).await?;

        let site_removed = session.remove_site(name)?.is_some();

        let pool_in_use = session.sites().iter().any(|s| {
            names_match(&s.default_application_pool, name)
                || s.applications
                    .iter()
                    .any(|a| names_match(&a.application_pool_name, name))
        });
        let pool_removed = if pool_in_use {
            tracing::info!(pool = %name, "Application pool still in use, keeping it");
            false
        } else {
            session.remove_pool(name).is_some()
        };

        if !site_removed && !pool_removed {
            tracing::debug!(site = %name, "Nothing to remove");
            return Ok(RemoveSiteResponse {
                site_removed,
                pool_removed,
            });
        }

        session.commit().await?;

        tracing::info!(site = %name, site_removed, pool_removed, "Site removed");
        Ok(RemoveSiteResponse {
            site_removed,
            pool_removed,
        })
    }
}

// ============================================================================
// CreateSite
// ============================================================================

/// CreateSite Handler - HTTP 站点，应用程序池与站点同名
pub struct CreateSiteHandler {
    store: Arc<dyn SiteStorePort>,
    defaults: SiteDefaults,
}

impl CreateSiteHandler {
    pub fn new(store: Arc<dyn SiteStorePort>, defaults: SiteDefaults) -> Self {
        Self { store, defaults }
    }

    pub async fn handle(&self, command: CreateSite) -> Result<CreatedSite, ApplicationError> {
        let name = SiteName::parse(command.site_name)?;
        validate_physical_path(&command.physical_path)?;
        let binding = Binding::http(BindingInformation::any_address(command.port)?);

        install_site(
            self.store.clone(),
            &self.defaults,
            &name,
            binding,
            &command.physical_path,
            name.as_str(),
            command.net_core,
        )
        .await
    }
}

// ============================================================================
// CreateHttpsSite
// ============================================================================

/// CreateHttpsSite Handler
///
/// 先把证书导入证书存储，再以证书指纹创建 HTTPS 绑定。
pub struct CreateHttpsSiteHandler {
    store: Arc<dyn SiteStorePort>,
    certificates: Arc<dyn CertificateStorePort>,
    defaults: SiteDefaults,
}

impl CreateHttpsSiteHandler {
    pub fn new(
        store: Arc<dyn SiteStorePort>,
        certificates: Arc<dyn CertificateStorePort>,
        defaults: SiteDefaults,
    ) -> Self {
        Self {
            store,
            certificates,
            defaults,
        }
    }

    pub async fn handle(&self, command: CreateHttpsSite) -> Result<CreatedSite, ApplicationError> {
        let name = SiteName::parse(command.site_name)?;
        validate_physical_path(&command.physical_path)?;
        let information = BindingInformation::new("*", 443, command.host_name.trim())?;
        let pool_name = non_empty(command.pool_name.as_deref())
            .unwrap_or_else(|| self.defaults.default_pool_name.clone());

        let certificate = self
            .certificates
            .import(&command.certificate_path, &command.certificate_password)
            .await?;

        tracing::info!(
            hash = %certificate.hash,
            store = %certificate.store_name,
            subject = %certificate.subject,
            "Certificate imported"
        );

        let binding = Binding::https(
            information,
            CertificateBinding {
                hash: certificate.hash,
                store_name: certificate.store_name,
            },
        );

        install_site(
            self.store.clone(),
            &self.defaults,
            &name,
            binding,
            &command.physical_path,
            &pool_name,
            command.net_core,
        )
        .await
    }
}

// ============================================================================
// CreateVirtualApplication
// ============================================================================

/// 应用创建结果
#[derive(Debug, Clone)]
pub struct CreatedApplication {
    pub site_name: String,
    pub path: String,
    pub physical_path: PathBuf,
    pub application_pool: String,
}

/// CreateVirtualApplication Handler
pub struct CreateVirtualApplicationHandler {
    store: Arc<dyn SiteStorePort>,
    defaults: SiteDefaults,
}

impl CreateVirtualApplicationHandler {
    pub fn new(store: Arc<dyn SiteStorePort>, defaults: SiteDefaults) -> Self {
        Self { store, defaults }
    }

    pub async fn handle(
        &self,
        command: CreateVirtualApplication,
    ) -> Result<CreatedApplication, ApplicationError> {
        validate_physical_path(&command.physical_path)?;
        let pool_name = non_empty(command.pool_name.as_deref());

        let mut session = StoreSession::open(self.store.clone()).await?;

        let site_name = session
            .find_site(&command.site_name)?
            .map(|s| s.name.clone())
            .ok_or_else(|| SiteError::SiteNotFound(command.site_name.clone()))?;

        if let Some(pool) = &pool_name {
            provision_pool(&mut session, pool, command.net_core, &self.defaults)?;
        }

        let application =
            session.add_application(&site_name, &command.virtual_path, &command.physical_path)?;
        if let Some(pool) = &pool_name {
            application.application_pool_name = pool.clone();
        }

        let created = CreatedApplication {
            site_name,
            path: application.path.clone(),
            physical_path: command.physical_path.clone(),
            application_pool: application.application_pool_name.clone(),
        };

        session.commit().await?;

        tracing::info!(
            site = %created.site_name,
            path = %created.path,
            pool = %created.application_pool,
            "Application created"
        );

        Ok(created)
    }
}

// ============================================================================
// CloneSite
// ============================================================================

/// 克隆站点结果
#[derive(Debug, Clone)]
pub struct ClonedSite {
    pub site: CreatedSite,
    pub files_copied: u64,
    pub bytes_copied: u64,
}

/// CloneSite Handler
///
/// 把内容根目录复制到同级目录 `{parent}/{site_name}`，再以该目录创建站点。
/// 目标目录必须不存在；复制或建站失败时删除已复制的目录。
pub struct CloneSiteHandler {
    store: Arc<dyn SiteStorePort>,
    copier: Arc<dyn ContentCopierPort>,
    defaults: SiteDefaults,
}

impl CloneSiteHandler {
    pub fn new(
        store: Arc<dyn SiteStorePort>,
        copier: Arc<dyn ContentCopierPort>,
        defaults: SiteDefaults,
    ) -> Self {
        Self {
            store,
            copier,
            defaults,
        }
    }

    pub async fn handle(&self, command: CloneSite) -> Result<ClonedSite, ApplicationError> {
        let name = SiteName::parse(command.site_name)?;
        let binding = Binding::http(BindingInformation::any_address(command.port)?);

        let parent = command
            .content_root
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| {
                ApplicationError::validation(format!(
                    "Content root has no parent directory: {}",
                    command.content_root.display()
                ))
            })?;
        let target = parent.join(name.as_str());

        // 复制前确认站点名称可用
        {
            let session = StoreSession::open(self.store.clone()).await?;
            if session.sites().iter().any(|s| names_match(&s.name, name.as_str())) {
                return Err(SiteError::SiteAlreadyExists(name.into_inner()).into());
            }
        }

        let stats = match self.copier.copy_tree(&command.content_root, &target).await {
            Ok(stats) => stats,
            Err(CopyError::DestinationExists(path)) => {
                return Err(CopyError::DestinationExists(path).into());
            }
            Err(e) => {
                self.discard_copy(&target).await;
                return Err(e.into());
            }
        };

        tracing::info!(
            from = %command.content_root.display(),
            to = %target.display(),
            files = stats.files,
            bytes = stats.bytes,
            "Content copied"
        );

        let site = match install_site(
            self.store.clone(),
            &self.defaults,
            &name,
            binding,
            &target,
            name.as_str(),
            true,
        )
        .await
        {
            Ok(site) => site,
            Err(e) => {
                self.discard_copy(&target).await;
                return Err(e);
            }
        };

        Ok(ClonedSite {
            site,
            files_copied: stats.files,
            bytes_copied: stats.bytes,
        })
    }

    async fn discard_copy(&self, target: &Path) {
        match self.copier.remove_tree(target).await {
            Ok(()) => tracing::warn!(path = %target.display(), "Partial copy removed"),
            Err(e) => tracing::error!(
                path = %target.display(),
                error = %e,
                "Failed to remove partial copy"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tempfile::tempdir;

    use crate::application::ports::{CertificateError, ImportedCertificate, StoreError};
    use crate::application::queries::handlers::CheckSiteExistsHandler;
    use crate::application::queries::{CheckSiteExists, Presence};
    use crate::domain::site::Protocol;
    use crate::infrastructure::adapters::FsContentCopier;
    use crate::infrastructure::memory::InMemorySiteStore;

    struct FakeCertificateStore;

    #[async_trait]
    impl CertificateStorePort for FakeCertificateStore {
        async fn import(
            &self,
            certificate_path: &Path,
            _password: &str,
        ) -> Result<ImportedCertificate, CertificateError> {
            if certificate_path.as_os_str().is_empty() {
                return Err(CertificateError::FileNotFound(String::new()));
            }
            Ok(ImportedCertificate {
                hash: "ABCDEF".to_string(),
                store_name: "TrustedPeople".to_string(),
                subject: "CN=test".to_string(),
            })
        }
    }

    /// 读取正常、提交总是失败的存储
    struct RejectingStore(InMemorySiteStore);

    #[async_trait]
    impl SiteStorePort for RejectingStore {
        async fn load(&self) -> Result<ServerConfiguration, StoreError> {
            self.0.load().await
        }

        async fn commit(&self, _configuration: ServerConfiguration) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("database is locked".to_string()))
        }

        async fn major_version(&self) -> Result<u32, StoreError> {
            self.0.major_version().await
        }
    }

    fn store() -> Arc<dyn SiteStorePort> {
        Arc::new(InMemorySiteStore::new(10))
    }

    fn create(name: &str, port: u16) -> CreateSite {
        CreateSite {
            site_name: name.to_string(),
            physical_path: PathBuf::from(format!("/srv/{}", name)),
            port,
            net_core: true,
        }
    }

    #[tokio::test]
    async fn test_create_site_provisions_pool_and_binds_default_application() {
        let store = store();
        let handler = CreateSiteHandler::new(store.clone(), SiteDefaults::default());

        let created = handler.handle(create("shop", 8080)).await.unwrap();
        assert!(created.pool_created);
        assert_eq!(created.bindings, vec!["*:8080:".to_string()]);
        assert_eq!(created.application_pool, "shop");

        let config = store.load().await.unwrap();
        let pool = config.find_pool("shop").unwrap();
        assert_eq!(pool.managed_runtime_version, None);

        let site = config.find_site("shop").unwrap().unwrap();
        assert_eq!(site.default_application_pool, "shop");
        assert_eq!(site.find_application("/").unwrap().application_pool_name, "shop");
        assert_eq!(site.bindings[0].protocol, Protocol::Http);
    }

    #[tokio::test]
    async fn test_create_site_reuses_existing_pool() {
        let store = store();
        let mut config = store.load().await.unwrap();
        config.add_pool("shop", Some("v2.0".to_string())).unwrap();
        store.commit(config).await.unwrap();

        let handler = CreateSiteHandler::new(store.clone(), SiteDefaults::default());
        let created = handler.handle(create("shop", 8080)).await.unwrap();
        assert!(!created.pool_created);

        let config = store.load().await.unwrap();
        assert_eq!(
            config.find_pool("shop").unwrap().managed_runtime_version.as_deref(),
            Some("v2.0")
        );
    }

    #[tokio::test]
    async fn test_create_site_rejects_duplicate_and_invalid_input() {
        let store = store();
        let handler = CreateSiteHandler::new(store.clone(), SiteDefaults::default());
        handler.handle(create("shop", 8080)).await.unwrap();

        assert!(matches!(
            handler.handle(create("SHOP", 8081)).await,
            Err(ApplicationError::Conflict(_))
        ));
        assert!(matches!(
            handler.handle(create("blog", 0)).await,
            Err(ApplicationError::ValidationError(_))
        ));
        assert!(matches!(
            handler.handle(create("  ", 8082)).await,
            Err(ApplicationError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_missing_site_succeeds_and_reports_absent() {
        let store = store();
        let remove = RemoveSiteHandler::new(store.clone());

        let result = remove
            .handle(RemoveSite {
                site_name: "ghost".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(
            result,
            RemoveSiteResponse {
                site_removed: false,
                pool_removed: false,
            }
        );

        let exists = CheckSiteExistsHandler::new(store.clone(), SiteDefaults::default())
            .handle(CheckSiteExists {
                site_name: "ghost".to_string(),
                application_path: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(exists.site, Presence::Absent);
    }

    #[tokio::test]
    async fn test_remove_site_removes_pool_unless_shared() {
        let store = store();
        let create_handler = CreateSiteHandler::new(store.clone(), SiteDefaults::default());
        create_handler.handle(create("shop", 8080)).await.unwrap();
        create_handler.handle(create("blog", 8081)).await.unwrap();

        // blog 的子应用使用 shop 的池
        let apps = CreateVirtualApplicationHandler::new(store.clone(), SiteDefaults::default());
        apps.handle(CreateVirtualApplication {
            site_name: "blog".to_string(),
            virtual_path: "legacy".to_string(),
            physical_path: PathBuf::from("/srv/legacy"),
            pool_name: Some("shop".to_string()),
            net_core: true,
        })
        .await
        .unwrap();

        let remove = RemoveSiteHandler::new(store.clone());
        let result = remove
            .handle(RemoveSite {
                site_name: "shop".to_string(),
            })
            .await
            .unwrap();
        assert!(result.site_removed);
        assert!(!result.pool_removed);

        let result = remove
            .handle(RemoveSite {
                site_name: "Blog".to_string(),
            })
            .await
            .unwrap();
        assert!(result.site_removed);
        assert!(result.pool_removed);

        let config = store.load().await.unwrap();
        assert!(config.sites().is_empty());
        assert!(config.find_pool("blog").is_none());
        assert!(config.find_pool("shop").is_some());
    }

    #[tokio::test]
    async fn test_start_and_stop_site() {
        let store = store();
        CreateSiteHandler::new(store.clone(), SiteDefaults::default())
            .handle(create("shop", 8080))
            .await
            .unwrap();

        StopSiteHandler::new(store.clone())
            .handle(StopSite {
                site_name: "shop".to_string(),
            })
            .await
            .unwrap();
        let config = store.load().await.unwrap();
        assert_eq!(config.find_site("shop").unwrap().unwrap().state, ObjectState::Stopped);

        StartSiteHandler::new(store.clone())
            .handle(StartSite {
                site_name: "SHOP".to_string(),
            })
            .await
            .unwrap();
        let config = store.load().await.unwrap();
        assert_eq!(config.find_site("shop").unwrap().unwrap().state, ObjectState::Started);

        let missing = StartSiteHandler::new(store.clone())
            .handle(StartSite {
                site_name: "ghost".to_string(),
            })
            .await;
        assert!(matches!(missing, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_https_site_binds_certificate() {
        let store = store();
        let handler = CreateHttpsSiteHandler::new(
            store.clone(),
            Arc::new(FakeCertificateStore),
            SiteDefaults::default(),
        );

        let created = handler
            .handle(CreateHttpsSite {
                site_name: "secure".to_string(),
                physical_path: PathBuf::from("/srv/secure"),
                host_name: "secure.example.com".to_string(),
                certificate_path: PathBuf::from("/certs/secure.pem"),
                certificate_password: String::new(),
                pool_name: None,
                net_core: false,
            })
            .await
            .unwrap();

        assert_eq!(created.bindings, vec!["*:443:secure.example.com".to_string()]);
        assert_eq!(created.application_pool, "DefaultAppPool");

        let config = store.load().await.unwrap();
        let site = config.find_site("secure").unwrap().unwrap();
        let binding = &site.bindings[0];
        assert_eq!(binding.protocol, Protocol::Https);
        assert_eq!(
            binding.certificate,
            Some(CertificateBinding {
                hash: "ABCDEF".to_string(),
                store_name: "TrustedPeople".to_string(),
            })
        );
        assert_eq!(
            config
                .find_pool("DefaultAppPool")
                .unwrap()
                .managed_runtime_version
                .as_deref(),
            Some("v4.0")
        );
    }

    #[tokio::test]
    async fn test_create_virtual_application() {
        let store = store();
        CreateSiteHandler::new(store.clone(), SiteDefaults::default())
            .handle(create("shop", 8080))
            .await
            .unwrap();

        let handler = CreateVirtualApplicationHandler::new(store.clone(), SiteDefaults::default());
        let created = handler
            .handle(CreateVirtualApplication {
                site_name: "SHOP".to_string(),
                virtual_path: "api".to_string(),
                physical_path: PathBuf::from("/srv/shop-api"),
                pool_name: Some("shop-api".to_string()),
                net_core: true,
            })
            .await
            .unwrap();
        assert_eq!(created.site_name, "shop");
        assert_eq!(created.path, "/api");
        assert_eq!(created.application_pool, "shop-api");

        let inherited = handler
            .handle(CreateVirtualApplication {
                site_name: "shop".to_string(),
                virtual_path: "/docs".to_string(),
                physical_path: PathBuf::from("/srv/shop-docs"),
                pool_name: None,
                net_core: true,
            })
            .await
            .unwrap();
        assert_eq!(inherited.application_pool, "shop");

        let missing = handler
            .handle(CreateVirtualApplication {
                site_name: "ghost".to_string(),
                virtual_path: "/x".to_string(),
                physical_path: PathBuf::from("/srv/x"),
                pool_name: None,
                net_core: true,
            })
            .await;
        assert!(matches!(missing, Err(ApplicationError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_clone_site_copies_tree_and_creates_site() {
        let temp = tempdir().unwrap();
        let content_root = temp.path().join("current");
        tokio::fs::create_dir_all(content_root.join("wwwroot/css")).await.unwrap();
        tokio::fs::write(content_root.join("appsettings.json"), b"{}").await.unwrap();
        tokio::fs::write(content_root.join("wwwroot/css/site.css"), b"body{}").await.unwrap();

        let store = store();
        let handler = CloneSiteHandler::new(
            store.clone(),
            Arc::new(FsContentCopier::new()),
            SiteDefaults::default(),
        );

        let cloned = handler
            .handle(CloneSite {
                site_name: "foo".to_string(),
                port: 8080,
                content_root: content_root.clone(),
            })
            .await
            .unwrap();

        let target = temp.path().join("foo");
        assert_eq!(cloned.files_copied, 2);
        assert_eq!(cloned.site.physical_path, target);
        assert_eq!(cloned.site.bindings, vec!["*:8080:".to_string()]);
        assert_eq!(
            tokio::fs::read(target.join("wwwroot/css/site.css")).await.unwrap(),
            b"body{}"
        );
        assert_eq!(tokio::fs::read(target.join("appsettings.json")).await.unwrap(), b"{}");

        let config = store.load().await.unwrap();
        let site = config.find_site("foo").unwrap().unwrap();
        assert_eq!(site.primary_physical_path(), Some(target.as_path()));
    }

    #[tokio::test]
    async fn test_clone_site_with_taken_name_copies_nothing() {
        let temp = tempdir().unwrap();
        let content_root = temp.path().join("current");
        tokio::fs::create_dir_all(&content_root).await.unwrap();

        let store = store();
        CreateSiteHandler::new(store.clone(), SiteDefaults::default())
            .handle(create("foo", 8080))
            .await
            .unwrap();

        let handler = CloneSiteHandler::new(
            store.clone(),
            Arc::new(FsContentCopier::new()),
            SiteDefaults::default(),
        );
        let result = handler
            .handle(CloneSite {
                site_name: "Foo".to_string(),
                port: 8081,
                content_root,
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::Conflict(_))));
        assert!(!temp.path().join("Foo").exists());
    }

    #[tokio::test]
    async fn test_clone_site_removes_copy_when_commit_fails() {
        let temp = tempdir().unwrap();
        let content_root = temp.path().join("current");
        tokio::fs::create_dir_all(&content_root).await.unwrap();
        tokio::fs::write(content_root.join("index.html"), b"hi").await.unwrap();

        let store: Arc<dyn SiteStorePort> = Arc::new(RejectingStore(InMemorySiteStore::new(10)));
        let handler = CloneSiteHandler::new(
            store,
            Arc::new(FsContentCopier::new()),
            SiteDefaults::default(),
        );

        let result = handler
            .handle(CloneSite {
                site_name: "foo".to_string(),
                port: 8080,
                content_root,
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::Transient(_))));
        assert!(!temp.path().join("foo").exists());
    }

    #[tokio::test]
    async fn test_clone_site_keeps_existing_destination() {
        let temp = tempdir().unwrap();
        let content_root = temp.path().join("current");
        tokio::fs::create_dir_all(&content_root).await.unwrap();
        let existing = temp.path().join("foo");
        tokio::fs::create_dir_all(&existing).await.unwrap();
        tokio::fs::write(existing.join("keep.txt"), b"keep").await.unwrap();

        let handler = CloneSiteHandler::new(
            store(),
            Arc::new(FsContentCopier::new()),
            SiteDefaults::default(),
        );
        let result = handler
            .handle(CloneSite {
                site_name: "foo".to_string(),
                port: 8080,
                content_root,
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::Conflict(_))));
        assert!(existing.join("keep.txt").exists());
    }
}
