mod memory;


pub mod config;

use std::fmt;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use memory::MemoryCache;

/// The slots of the financial dashboard. Each one maps to a single backend read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    UserInfo,
    Report,
    Debts,
    Goals,
    Deposits,
    Transactions,
    Expenses,
    Incomes,
    Categories,
    IncomeSources,
    Accounts,
    IncomesVsExpenses,
}

impl Resource {
    pub const ALL: [Resource; 12] = [
        Self::UserInfo,
        Self::Report,
        Self::Debts,
        Self::Goals,
        Self::Deposits,
        Self::Transactions,
        Self::Expenses,
        Self::Incomes,
        Self::Categories,
        Self::IncomeSources,
        Self::Accounts,
        Self::IncomesVsExpenses,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::UserInfo => "user-info",
            Self::Report => "report",
            Self::Debts => "debts",
            Self::Goals => "goals",
            Self::Deposits => "deposits",
            Self::Transactions => "transactions",
            Self::Expenses => "expenses",
            Self::Incomes => "incomes",
            Self::Categories => "categories",
            Self::IncomeSources => "income-sources",
            Self::Accounts => "accounts",
            Self::IncomesVsExpenses => "incomes-vs-expenses",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match Self::ALL.iter().find(|r| r.name() == name) {
            Some(resource) => Ok(*resource),
            None => bail!("unknown resource '{name}'"),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// `sub_key` separates entries of the same resource, e.g. deposits of different
/// goals. Singleton resources use `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub resource: Resource,
    pub sub_key: Option<u64>,
}

impl CacheKey {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            sub_key: None,
        }
    }

    pub fn with_sub_key(resource: Resource, sub_key: u64) -> Self {
        Self {
            resource,
            sub_key: Some(sub_key),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub_key {
            Some(sub_key) => write!(f, "{}/{sub_key}", self.resource),
            None => write!(f, "{}", self.resource),
        }
    }
}

/// A key-value cache where every entry carries its own time to live. An expired
/// entry reads as absent.
pub trait Cache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Result<Option<Value>>;
    fn set(&self, key: CacheKey, value: Value, ttl: Duration) -> Result<()>;

    /// Remove one entry, or every entry when `key` is `None`.
    fn invalidate(&self, key: Option<&CacheKey>) -> Result<()>;

    /// Remove every entry of `resource`, whatever its sub key.
    fn invalidate_resource(&self, resource: Resource) -> Result<()>;
}

pub enum UnionCache {
    Memory(MemoryCache),
}

impl Cache for UnionCache {
    fn get(&self, key: &CacheKey) -> Result<Option<Value>> {
        match self {
            Self::Memory(cache) => cache.get(key),
        }
    }

    fn set(&self, key: CacheKey, value: Value, ttl: Duration) -> Result<()> {
        match self {
            Self::Memory(cache) => cache.set(key, value, ttl),
        }
    }

    fn invalidate(&self, key: Option<&CacheKey>) -> Result<()> {
        match self {
            Self::Memory(cache) => cache.invalidate(key),
        }
    }

    fn invalidate_resource(&self, resource: Resource) -> Result<()> {
        match self {
            Self::Memory(cache) => cache.invalidate_resource(resource),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DisableCache;

impl Cache for DisableCache {
    fn get(&self, _key: &CacheKey) -> Result<Option<Value>> {
        Ok(None)
    }

    fn set(&self, _key: CacheKey, _value: Value, _ttl: Duration) -> Result<()> {
        Ok(())
    }

    fn invalidate(&self, _key: Option<&CacheKey>) -> Result<()> {
        Ok(())
    }

    fn invalidate_resource(&self, _resource: Resource) -> Result<()> {
        Ok(())
    }
}
