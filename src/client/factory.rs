use std::sync::Arc;

use anyhow::Result;

use crate::config::{CommonConfig, PathSet};
use crate::session::Session;
use crate::storage::factory::StorageFactory;

use super::config::ClientConfig;
use super::Client;

pub struct ClientFactory {
    cfg: ClientConfig,
}

impl ClientFactory {
    pub fn new(cfg: ClientConfig) -> Self {
        Self { cfg }
    }

    pub fn load(ps: &PathSet) -> Result<Self> {
        let cfg = ps.load_config("client", ClientConfig::default)?;
        Ok(Self { cfg })
    }

    pub fn build_session(&self) -> Result<Arc<Session>> {
        let storage = StorageFactory::new().build_storage(&self.cfg.storage)?;
        Ok(Arc::new(Session::new(storage)))
    }

    pub fn build_client(&self) -> Result<Arc<Client>> {
        let session = self.build_session()?;
        self.build_client_with_session(session)
    }

    pub fn build_client_with_session(&self, session: Arc<Session>) -> Result<Arc<Client>> {
        let client = Client::new(&self.cfg.server, session, self.cfg.options())?;
        Ok(Arc::new(client))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.cfg
    }
}
