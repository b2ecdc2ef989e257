use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{parse_duration, CommonConfig, PathSet};

use super::Resource;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "CacheConfig::default_enable")]
    pub enable: bool,

    #[serde(default = "CacheConfig::default_name")]
    pub name: CacheType,

    /// Time to live of resources without an entry in `ttl`.
    #[serde(default = "CacheConfig::default_ttl")]
    pub default_ttl: String,

    /// Resource name to time to live, e.g. `user-info = "1h"`.
    #[serde(default = "BTreeMap::new")]
    pub ttl: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum CacheType {
    #[serde(rename = "memory")]
    Memory,
}

impl CommonConfig for CacheConfig {
    fn default() -> Self {
        Self {
            enable: Self::default_enable(),
            name: Self::default_name(),
            default_ttl: Self::default_ttl(),
            ttl: BTreeMap::new(),
        }
    }

    fn complete(&mut self, _ps: &PathSet) -> Result<()> {
        self.ttl_policy()?;
        Ok(())
    }
}

impl CacheConfig {
    fn default_enable() -> bool {
        true
    }

    fn default_name() -> CacheType {
        CacheType::Memory
    }

    fn default_ttl() -> String {
        String::from("5m")
    }

    pub fn ttl_policy(&self) -> Result<TtlPolicy> {
        let default = parse_duration("default_ttl", &self.default_ttl)?;
        if default.is_zero() {
            bail!("default_ttl cannot be zero");
        }
        let mut overrides = HashMap::with_capacity(self.ttl.len());
        for (name, ttl) in self.ttl.iter() {
            let resource = Resource::from_name(name).context("ttl")?;
            let ttl = parse_duration(name, ttl)?;
            if ttl.is_zero() {
                bail!("ttl of '{name}' cannot be zero");
            }
            overrides.insert(resource, ttl);
        }
        Ok(TtlPolicy { default, overrides })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlPolicy {
    default: Duration,
    overrides: HashMap<Resource, Duration>,
}

impl TtlPolicy {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

    pub fn new(default: Duration) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    pub fn with_ttl(mut self, resource: Resource, ttl: Duration) -> Self {
        self.overrides.insert(resource, ttl);
        self
    }

    pub fn ttl(&self, resource: Resource) -> Duration {
        self.overrides
            .get(&resource)
            .copied()
            .unwrap_or(self.default)
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TTL)
    }
}
