//! Application Pool Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::SiteStorePort;
use crate::application::queries::{GetPoolState, ObjectStatus, Presence};
use crate::application::session::StoreSession;

/// GetPoolState Handler
///
/// 存储读取失败时返回 `Indeterminate`
pub struct GetPoolStateHandler {
    store: Arc<dyn SiteStorePort>,
}

impl GetPoolStateHandler {
    pub fn new(store: Arc<dyn SiteStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetPoolState) -> Result<ObjectStatus, ApplicationError> {
        let session = match StoreSession::open(self.store.clone()).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(pool = %query.pool_name, error = %e, "Pool state is indeterminate");
                return Ok(ObjectStatus::indeterminate());
            }
        };

        Ok(match session.find_pool(query.pool_name.trim()) {
            Some(pool) => ObjectStatus {
                presence: Presence::Present,
                state: Some(pool.state),
            },
            None => ObjectStatus::absent(),
        })
    }
}
