//! Store Session - 一次存储访问
//!
//! 打开时读取配置快照，修改只作用于快照；`commit` 整体提交，
//! 未提交就丢弃的会话不会留下任何修改。

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::application::ports::{SiteStorePort, StoreError};
use crate::domain::site::ServerConfiguration;

pub struct StoreSession {
    store: Arc<dyn SiteStorePort>,
    configuration: ServerConfiguration,
}

impl StoreSession {
    pub async fn open(store: Arc<dyn SiteStorePort>) -> Result<Self, StoreError> {
        let configuration = store.load().await?;
        tracing::debug!(revision = configuration.revision(), "Store session opened");
        Ok(Self {
            store,
            configuration,
        })
    }

    /// 提交修改，返回新的版本号
    pub async fn commit(self) -> Result<u64, StoreError> {
        let revision = self.store.commit(self.configuration).await?;
        tracing::debug!(revision, "Store session committed");
        Ok(revision)
    }
}

impl Deref for StoreSession {
    type Target = ServerConfiguration;

    fn deref(&self) -> &Self::Target {
        &self.configuration
    }
}

impl DerefMut for StoreSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.configuration
    }
}
