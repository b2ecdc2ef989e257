use std::path::PathBuf;

use anyhow::Result;

use super::config::{StorageConfig, StorageType};
use super::{FileStorage, MemoryStorage, UnionStorage};

pub struct StorageFactory;

impl StorageFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_storage(&self, cfg: &StorageConfig) -> Result<UnionStorage> {
        let storage = match cfg.name {
            StorageType::File => UnionStorage::File(FileStorage::new(PathBuf::from(&cfg.dir))?),
            StorageType::Memory => UnionStorage::Memory(MemoryStorage::new()),
        };
        Ok(storage)
    }
}
