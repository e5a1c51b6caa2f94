//! SQLite Database - 数据库连接和迁移

use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::path::Path;

/// 数据库配置
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 数据库连接 URL
    pub database_url: String,
    /// 最大连接数
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:./data/siteadmin.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

impl DatabaseConfig {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            database_url: format!("sqlite:{}?mode=rwc", path.as_ref().display()),
            max_connections: 5,
        }
    }

    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }
}

/// 数据库连接池
pub type DbPool = Pool<Sqlite>;

/// 创建数据库连接池
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    // 启用 WAL 模式，允许并发读写
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await?;

    // 遇到锁时等待而不是立即失败
    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA synchronous=NORMAL")
        .execute(&pool)
        .await?;

    tracing::info!("SQLite pool created with WAL mode and busy_timeout=5000ms");

    Ok(pool)
}

/// 运行数据库迁移
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    // 单行元数据：配置版本号和服务器主版本号
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS store_meta (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            revision INTEGER NOT NULL DEFAULT 0,
            next_site_id INTEGER NOT NULL DEFAULT 1,
            major_version INTEGER
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO store_meta (id, revision) VALUES (1, 0)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS application_pools (
            name TEXT PRIMARY KEY COLLATE NOCASE,
            position INTEGER NOT NULL,
            managed_runtime_version TEXT,
            pipeline_mode TEXT NOT NULL,
            state TEXT NOT NULL,
            last_recycled_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sites (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            state TEXT NOT NULL,
            default_application_pool TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS site_bindings (
            site_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            protocol TEXT NOT NULL,
            binding_information TEXT NOT NULL,
            certificate_hash TEXT,
            certificate_store_name TEXT,
            PRIMARY KEY (site_id, position),
            FOREIGN KEY (site_id) REFERENCES sites(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS applications (
            site_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            path TEXT NOT NULL,
            application_pool_name TEXT NOT NULL,
            PRIMARY KEY (site_id, position),
            FOREIGN KEY (site_id) REFERENCES sites(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS virtual_directories (
            site_id INTEGER NOT NULL,
            application_position INTEGER NOT NULL,
            position INTEGER NOT NULL,
            path TEXT NOT NULL,
            physical_path TEXT NOT NULL,
            PRIMARY KEY (site_id, application_position, position),
            FOREIGN KEY (site_id, application_position)
                REFERENCES applications(site_id, position) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database migrations completed");
    Ok(())
}

/// 记录服务器主版本号
pub async fn record_major_version(pool: &DbPool, major_version: u32) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE store_meta SET major_version = ? WHERE id = 1")
        .bind(i64::from(major_version))
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_in_memory_db() {
        let config = DatabaseConfig::in_memory();
        let pool = create_pool(&config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        // 迁移可重复执行
        run_migrations(&pool).await.unwrap();

        let revision: i64 = sqlx::query_scalar("SELECT revision FROM store_meta WHERE id = 1")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(revision, 0);
    }

    #[test]
    fn test_database_url_from_path() {
        let config = DatabaseConfig::new("data/siteadmin.db");
        assert_eq!(config.database_url, "sqlite:data/siteadmin.db?mode=rwc");
    }
}
