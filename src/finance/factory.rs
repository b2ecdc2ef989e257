use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cache::config::{CacheConfig, CacheType};
use crate::cache::{MemoryCache, UnionCache};
use crate::client::Client;
use crate::config::{CommonConfig, PathSet};

use super::FinancialData;

pub struct FinancialDataFactory {
    cfg: CacheConfig,
}

impl FinancialDataFactory {
    pub fn new(cfg: CacheConfig) -> Self {
        Self { cfg }
    }

    pub fn load(ps: &PathSet) -> Result<Self> {
        let cfg = ps.load_config("cache", CacheConfig::default)?;
        Ok(Self { cfg })
    }

    pub fn build_cache(&self) -> Option<UnionCache> {
        if !self.cfg.enable {
            return None;
        }
        let cache = match self.cfg.name {
            CacheType::Memory => UnionCache::Memory(MemoryCache::new()),
        };
        Some(cache)
    }

    pub fn build(&self, client: Arc<Client>) -> Result<FinancialData> {
        let ttl = self.cfg.ttl_policy().context("cache ttl")?;
        Ok(FinancialData::new(client, self.build_cache(), ttl))
    }

    pub fn config(&self) -> &CacheConfig {
        &self.cfg
    }
}
