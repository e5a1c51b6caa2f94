//! In-Memory Site Store Implementation

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{SiteStorePort, StoreError};
use crate::domain::site::{ApplicationPool, ServerConfiguration, Site};

#[derive(Default)]
struct StoreState {
    revision: u64,
    next_site_id: i64,
    sites: Vec<Site>,
    pools: Vec<ApplicationPool>,
}

/// 内存站点存储
///
/// 进程内保存配置，提交时按版本号做乐观并发检查
pub struct InMemorySiteStore {
    state: RwLock<StoreState>,
    major_version: u32,
}

impl InMemorySiteStore {
    pub fn new(major_version: u32) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            major_version,
        }
    }
}

#[async_trait]
impl SiteStorePort for InMemorySiteStore {
    async fn load(&self) -> Result<ServerConfiguration, StoreError> {
        let state = self.state.read().await;
        Ok(ServerConfiguration::new(
            state.revision,
            state.sites.clone(),
            state.pools.clone(),
        )
        .with_next_site_id(state.next_site_id))
    }

    async fn commit(&self, configuration: ServerConfiguration) -> Result<u64, StoreError> {
        let mut state = self.state.write().await;
        let next_site_id = configuration.next_site_id();
        let (revision, sites, pools) = configuration.into_parts();

        if revision != state.revision {
            return Err(StoreError::Conflict(format!(
                "snapshot revision {} is behind store revision {}",
                revision, state.revision
            )));
        }

        state.revision += 1;
        state.next_site_id = next_site_id;
        state.sites = sites;
        state.pools = pools;

        tracing::debug!(revision = state.revision, "In-memory store committed");
        Ok(state.revision)
    }

    async fn major_version(&self) -> Result<u32, StoreError> {
        Ok(self.major_version)
    }
}
