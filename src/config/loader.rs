//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::{AppConfig, StoreBackend};

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `SITEADMIN_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `SITEADMIN_SERVER__PORT=8080`
/// - `SITEADMIN_STORE__BACKEND=memory`
/// - `SITEADMIN_STORE__DATABASE_PATH=/data/siteadmin.db`
/// - `SITEADMIN_HOSTING__CONTENT_ROOT=/srv/sites/current`
///
/// # 返回
/// - `Ok(AppConfig)` - 成功加载的配置
/// - `Err(ConfigError)` - 加载失败
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("store.backend", "sqlite")?
        .set_default("store.database_path", "data/siteadmin.db")?
        .set_default("store.max_connections", 5)?
        .set_default("store.major_version", 10)?
        .set_default("store.default_site_name", "Default Web Site")?
        .set_default("store.default_pool_name", "DefaultAppPool")?
        .set_default("store.legacy_runtime_version", "v4.0")?
        .set_default("certificates.store_dir", "data/certificates")?
        .set_default("certificates.store_name", "TrustedPeople")?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: SITEADMIN_
    // 层级分隔符: __ (双下划线)
    // 例如: SITEADMIN_STORE__BACKEND=memory
    // 注意: 环境变量名会被转换为小写
    builder = builder.add_source(
        Environment::with_prefix("SITEADMIN")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证端口范围
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    // sqlite 后端需要数据库路径
    if config.store.backend == StoreBackend::Sqlite && config.store.database_path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    if config.store.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "Store max connections cannot be 0".to_string(),
        ));
    }

    if config.store.default_site_name.trim().is_empty()
        || config.store.default_pool_name.trim().is_empty()
    {
        return Err(ConfigError::ValidationError(
            "Default site and pool names cannot be empty".to_string(),
        ));
    }

    if config.certificates.store_name.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Certificate store name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Store Backend: {:?}", config.store.backend);
    if config.store.backend == StoreBackend::Sqlite {
        tracing::info!("Database: {}", config.store.database_path);
        tracing::info!("Database Max Connections: {}", config.store.max_connections);
    }
    tracing::info!("Server Major Version: {}", config.store.major_version);
    tracing::info!("Default Site: {}", config.store.default_site_name);
    tracing::info!("Default Pool: {}", config.store.default_pool_name);
    match &config.hosting.content_root {
        Some(root) => tracing::info!("Content Root: {:?}", root),
        None => tracing::info!("Content Root: <working directory>"),
    }
    tracing::info!(
        "Certificate Store: {:?} ({})",
        config.certificates.store_dir,
        config.certificates.store_name
    );
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
