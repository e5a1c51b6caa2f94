//! Server Query Handlers

use std::sync::Arc;

use crate::application::ports::SiteStorePort;
use crate::application::queries::GetServerVersion;

/// 无法读取版本号时返回的值
pub const UNKNOWN_VERSION: i32 = -1;

/// GetServerVersion Handler
pub struct GetServerVersionHandler {
    store: Arc<dyn SiteStorePort>,
}

impl GetServerVersionHandler {
    pub fn new(store: Arc<dyn SiteStorePort>) -> Self {
        Self { store }
    }

    /// 主版本号，读取失败时为 `-1`
    pub async fn handle(&self, _query: GetServerVersion) -> i32 {
        match self.store.major_version().await {
            Ok(version) => i32::try_from(version).unwrap_or(UNKNOWN_VERSION),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read server version");
                UNKNOWN_VERSION
            }
        }
    }
}
