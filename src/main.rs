//! siteadmin - 站点管理 HTTP 服务
//!
//! - Domain: site/ (站点、应用、应用程序池), folder_name
//! - Application: commands, queries, ports
//! - Infrastructure: http, memory, persistence, adapters

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

use siteadmin::application::SiteStorePort;
use siteadmin::config::{load_config, print_config, AppConfig, StoreBackend};
use siteadmin::infrastructure::adapters::{FileCertificateStore, FsContentCopier};
use siteadmin::infrastructure::http::{AppState, HttpServer, ServerConfig};
use siteadmin::infrastructure::memory::InMemorySiteStore;
use siteadmin::infrastructure::persistence::sqlite::{
    create_pool, record_major_version, run_migrations, DatabaseConfig, SqliteSiteStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    init_tracing(&config);

    tracing::info!("siteadmin - 站点管理服务");
    print_config(&config);

    let store = open_store(&config).await?;

    let content_root = config
        .hosting
        .content_root()
        .context("Failed to resolve content root")?;
    let content_root = tokio::fs::canonicalize(&content_root)
        .await
        .with_context(|| format!("Content root is not accessible: {}", content_root.display()))?;
    tracing::info!(content_root = %content_root.display(), "Content root resolved");

    let certificates = Arc::new(FileCertificateStore::new(
        &config.certificates.store_dir,
        config.certificates.store_name.clone(),
    ));
    let copier = Arc::new(FsContentCopier::new());

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        store,
        certificates,
        copier,
        config.store.site_defaults(),
        content_root,
    );

    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},siteadmin={},tower_http=debug",
        config.log.level, config.log.level
    );
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }
}

/// 按配置打开站点配置存储
async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn SiteStorePort>> {
    match config.store.backend {
        StoreBackend::Sqlite => {
            // 确保数据目录存在
            if let Some(parent) = Path::new(&config.store.database_path).parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            let db_config = DatabaseConfig {
                database_url: config.store.database_url(),
                max_connections: config.store.max_connections,
            };
            let pool = create_pool(&db_config).await?;
            run_migrations(&pool).await?;
            record_major_version(&pool, config.store.major_version).await?;

            Ok(Arc::new(SqliteSiteStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, changes are lost on shutdown");
            Ok(Arc::new(InMemorySiteStore::new(config.store.major_version)))
        }
    }
}
