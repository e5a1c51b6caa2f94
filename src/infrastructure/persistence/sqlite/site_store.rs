//! SQLite Site Store
//!
//! 每次提交在一个事务内完成：先按版本号抢占写锁，再整体替换配置表

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Sqlite, Transaction};
use std::collections::HashMap;
use std::path::PathBuf;

use super::DbPool;
use crate::application::ports::{SiteStorePort, StoreError};
use crate::domain::site::{
    Application, ApplicationPool, Binding, CertificateBinding, ServerConfiguration, Site,
    VirtualDirectory,
};

/// SQLite Site Store
pub struct SqliteSiteStore {
    pool: DbPool,
}

impl SqliteSiteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// sqlx 错误按种类映射为存储错误
fn store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            StoreError::Unavailable(err.to_string())
        }
        sqlx::Error::Io(io) if io.kind() == std::io::ErrorKind::PermissionDenied => {
            StoreError::PermissionDenied(err.to_string())
        }
        sqlx::Error::Io(_) => StoreError::Io(err.to_string()),
        sqlx::Error::Database(db) => {
            // SQLite 扩展错误码的低 8 位是主错误码
            let primary = db
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .map(|code| code & 0xff);
            match primary {
                // SQLITE_BUSY / SQLITE_LOCKED
                Some(5) | Some(6) => StoreError::Unavailable(err.to_string()),
                // SQLITE_PERM / SQLITE_READONLY
                Some(3) | Some(8) => StoreError::PermissionDenied(err.to_string()),
                _ => StoreError::Database(err.to_string()),
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Corrupted(err.to_string())
        }
        _ => StoreError::Database(err.to_string()),
    }
}

fn corrupted(err: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupted(err.to_string())
}

// ============================================================================
// Rows
// ============================================================================

#[derive(FromRow)]
struct PoolRow {
    name: String,
    managed_runtime_version: Option<String>,
    pipeline_mode: String,
    state: String,
    last_recycled_at: Option<String>,
}

impl TryFrom<PoolRow> for ApplicationPool {
    type Error = StoreError;

    fn try_from(row: PoolRow) -> Result<Self, Self::Error> {
        Ok(ApplicationPool {
            name: row.name,
            managed_runtime_version: row.managed_runtime_version,
            pipeline_mode: row.pipeline_mode.parse().map_err(corrupted)?,
            state: row.state.parse().map_err(corrupted)?,
            last_recycled_at: row
                .last_recycled_at
                .map(|ts| {
                    DateTime::parse_from_rfc3339(&ts)
                        .map(|dt| dt.with_timezone(&Utc))
                        .map_err(corrupted)
                })
                .transpose()?,
        })
    }
}

#[derive(FromRow)]
struct SiteRow {
    id: i64,
    name: String,
    state: String,
    default_application_pool: String,
}

#[derive(FromRow)]
struct BindingRow {
    site_id: i64,
    protocol: String,
    binding_information: String,
    certificate_hash: Option<String>,
    certificate_store_name: Option<String>,
}

impl TryFrom<BindingRow> for Binding {
    type Error = StoreError;

    fn try_from(row: BindingRow) -> Result<Self, Self::Error> {
        let certificate = match (row.certificate_hash, row.certificate_store_name) {
            (Some(hash), Some(store_name)) => Some(CertificateBinding { hash, store_name }),
            _ => None,
        };
        Ok(Binding {
            protocol: row.protocol.parse().map_err(corrupted)?,
            information: row.binding_information.parse().map_err(corrupted)?,
            certificate,
        })
    }
}

#[derive(FromRow)]
struct ApplicationRow {
    site_id: i64,
    position: i64,
    path: String,
    application_pool_name: String,
}

#[derive(FromRow)]
struct VirtualDirectoryRow {
    site_id: i64,
    application_position: i64,
    path: String,
    physical_path: String,
}

// ============================================================================
// Load / Save
// ============================================================================

async fn read_configuration(
    tx: &mut Transaction<'_, Sqlite>,
) -> Result<ServerConfiguration, StoreError> {
    let (revision, next_site_id): (i64, i64) =
        sqlx::query_as("SELECT revision, next_site_id FROM store_meta WHERE id = 1")
            .fetch_one(&mut **tx)
            .await
            .map_err(store_error)?;

    let pool_rows: Vec<PoolRow> = sqlx::query_as(
        "SELECT name, managed_runtime_version, pipeline_mode, state, last_recycled_at \
         FROM application_pools ORDER BY position",
    )
    .fetch_all(&mut **tx)
    .await
    .map_err(store_error)?;

    let site_rows: Vec<SiteRow> = sqlx::query_as(
        "SELECT id, name, state, default_application_pool FROM sites ORDER BY id",
    )
    .fetch_all(&mut **tx)
    .await
    .map_err(store_error)?;

    let binding_rows: Vec<BindingRow> = sqlx::query_as(
        "SELECT site_id, protocol, binding_information, certificate_hash, certificate_store_name \
         FROM site_bindings ORDER BY site_id, position",
    )
    .fetch_all(&mut **tx)
    .await
    .map_err(store_error)?;

    let application_rows: Vec<ApplicationRow> = sqlx::query_as(
        "SELECT site_id, position, path, application_pool_name \
         FROM applications ORDER BY site_id, position",
    )
    .fetch_all(&mut **tx)
    .await
    .map_err(store_error)?;

    let directory_rows: Vec<VirtualDirectoryRow> = sqlx::query_as(
        "SELECT site_id, application_position, path, physical_path \
         FROM virtual_directories ORDER BY site_id, application_position, position",
    )
    .fetch_all(&mut **tx)
    .await
    .map_err(store_error)?;

    let mut directories: HashMap<(i64, i64), Vec<VirtualDirectory>> = HashMap::new();
    for row in directory_rows {
        directories
            .entry((row.site_id, row.application_position))
            .or_default()
            .push(VirtualDirectory {
                path: row.path,
                physical_path: PathBuf::from(row.physical_path),
            });
    }

    let mut applications: HashMap<i64, Vec<Application>> = HashMap::new();
    for row in application_rows {
        let virtual_directories = directories
            .remove(&(row.site_id, row.position))
            .unwrap_or_default();
        applications.entry(row.site_id).or_default().push(Application {
            path: row.path,
            application_pool_name: row.application_pool_name,
            virtual_directories,
        });
    }

    let mut bindings: HashMap<i64, Vec<Binding>> = HashMap::new();
    for row in binding_rows {
        let site_id = row.site_id;
        bindings
            .entry(site_id)
            .or_default()
            .push(Binding::try_from(row)?);
    }

    let sites = site_rows
        .into_iter()
        .map(|row| {
            Ok(Site {
                id: row.id,
                bindings: bindings.remove(&row.id).unwrap_or_default(),
                applications: applications.remove(&row.id).unwrap_or_default(),
                state: row.state.parse().map_err(corrupted)?,
                name: row.name,
                default_application_pool: row.default_application_pool,
            })
        })
        .collect::<Result<Vec<_>, StoreError>>()?;

    let pools = pool_rows
        .into_iter()
        .map(ApplicationPool::try_from)
        .collect::<Result<Vec<_>, StoreError>>()?;

    let revision = u64::try_from(revision).map_err(corrupted)?;
    Ok(ServerConfiguration::new(revision, sites, pools).with_next_site_id(next_site_id))
}

async fn replace_configuration(
    tx: &mut Transaction<'_, Sqlite>,
    sites: &[Site],
    pools: &[ApplicationPool],
) -> Result<(), sqlx::Error> {
    for table in [
        "virtual_directories",
        "applications",
        "site_bindings",
        "sites",
        "application_pools",
    ] {
        sqlx::query(&format!("DELETE FROM {}", table))
            .execute(&mut **tx)
            .await?;
    }

    for (position, pool) in pools.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO application_pools
                (name, position, managed_runtime_version, pipeline_mode, state, last_recycled_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&pool.name)
        .bind(position as i64)
        .bind(&pool.managed_runtime_version)
        .bind(pool.pipeline_mode.as_str())
        .bind(pool.state.as_str())
        .bind(pool.last_recycled_at.map(|ts| ts.to_rfc3339()))
        .execute(&mut **tx)
        .await?;
    }

    for site in sites {
        sqlx::query(
            "INSERT INTO sites (id, name, state, default_application_pool) VALUES (?, ?, ?, ?)",
        )
        .bind(site.id)
        .bind(&site.name)
        .bind(site.state.as_str())
        .bind(&site.default_application_pool)
        .execute(&mut **tx)
        .await?;

        for (position, binding) in site.bindings.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO site_bindings
                    (site_id, position, protocol, binding_information,
                     certificate_hash, certificate_store_name)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(site.id)
            .bind(position as i64)
            .bind(binding.protocol.as_str())
            .bind(binding.information.to_string())
            .bind(binding.certificate.as_ref().map(|c| c.hash.clone()))
            .bind(binding.certificate.as_ref().map(|c| c.store_name.clone()))
            .execute(&mut **tx)
            .await?;
        }

        for (app_position, application) in site.applications.iter().enumerate() {
            sqlx::query(
                "INSERT INTO applications (site_id, position, path, application_pool_name) \
                 VALUES (?, ?, ?, ?)",
            )
            .bind(site.id)
            .bind(app_position as i64)
            .bind(&application.path)
            .bind(&application.application_pool_name)
            .execute(&mut **tx)
            .await?;

            for (position, directory) in application.virtual_directories.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO virtual_directories
                        (site_id, application_position, position, path, physical_path)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(site.id)
                .bind(app_position as i64)
                .bind(position as i64)
                .bind(&directory.path)
                .bind(directory.physical_path.to_string_lossy().to_string())
                .execute(&mut **tx)
                .await?;
            }
        }
    }

    Ok(())
}

#[async_trait]
impl SiteStorePort for SqliteSiteStore {
    async fn load(&self) -> Result<ServerConfiguration, StoreError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        let configuration = read_configuration(&mut tx).await?;
        tx.commit().await.map_err(store_error)?;
        Ok(configuration)
    }

    async fn commit(&self, configuration: ServerConfiguration) -> Result<u64, StoreError> {
        let next_site_id = configuration.next_site_id();
        let (revision, sites, pools) = configuration.into_parts();
        let expected = i64::try_from(revision).map_err(corrupted)?;

        let mut tx = self.pool.begin().await.map_err(store_error)?;

        // 版本号检查与写锁在同一条语句里完成
        let claimed = sqlx::query(
            "UPDATE store_meta SET revision = revision + 1, next_site_id = ? \
             WHERE id = 1 AND revision = ?",
        )
        .bind(next_site_id)
        .bind(expected)
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;

        if claimed.rows_affected() == 0 {
            let current: Option<i64> =
                sqlx::query_scalar("SELECT revision FROM store_meta WHERE id = 1")
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(store_error)?;
            return Err(StoreError::Conflict(format!(
                "snapshot revision {} is behind store revision {}",
                revision,
                current.unwrap_or_default()
            )));
        }

        replace_configuration(&mut tx, &sites, &pools)
            .await
            .map_err(store_error)?;

        tx.commit().await.map_err(store_error)?;

        tracing::debug!(
            revision = revision + 1,
            sites = sites.len(),
            pools = pools.len(),
            "SQLite store committed"
        );

        Ok(revision + 1)
    }

    async fn major_version(&self) -> Result<u32, StoreError> {
        let version: Option<i64> =
            sqlx::query_scalar("SELECT major_version FROM store_meta WHERE id = 1")
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?
                .flatten();

        let version = version.ok_or_else(|| StoreError::NotFound("major_version".to_string()))?;
        u32::try_from(version).map_err(corrupted)
    }
}
