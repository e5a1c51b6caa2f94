//! Application Pool Command Handlers

use chrono::Utc;
use std::sync::Arc;

use crate::application::commands::{RecyclePool, StartPool, StopPool};
use crate::application::error::ApplicationError;
use crate::application::ports::SiteStorePort;
use crate::application::session::StoreSession;

/// StartPool Handler
pub struct StartPoolHandler {
    store: Arc<dyn SiteStorePort>,
}

impl StartPoolHandler {
    pub fn new(store: Arc<dyn SiteStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, command: StartPool) -> Result<(), ApplicationError> {
        let mut session = StoreSession::open(self.store.clone()).await?;
        session.start_pool(&command.pool_name)?;
        session.commit().await?;

        tracing::info!(pool = %command.pool_name, "Application pool started");
        Ok(())
    }
}

/// StopPool Handler
pub struct StopPoolHandler {
    store: Arc<dyn SiteStorePort>,
}

impl StopPoolHandler {
    pub fn new(store: Arc<dyn SiteStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, command: StopPool) -> Result<(), ApplicationError> {
        let mut session = StoreSession::open(self.store.clone()).await?;
        session.stop_pool(&command.pool_name)?;
        session.commit().await?;

        tracing::info!(pool = %command.pool_name, "Application pool stopped");
        Ok(())
    }
}

/// RecyclePool Handler
pub struct RecyclePoolHandler {
    store: Arc<dyn SiteStorePort>,
}

impl RecyclePoolHandler {
    pub fn new(store: Arc<dyn SiteStorePort>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, command: RecyclePool) -> Result<(), ApplicationError> {
        let mut session = StoreSession::open(self.store.clone()).await?;
        session.recycle_pool(&command.pool_name, Utc::now())?;
        session.commit().await?;

        tracing::info!(pool = %command.pool_name, "Application pool recycled");
        Ok(())
    }
}
