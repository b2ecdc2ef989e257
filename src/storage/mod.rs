mod file;
mod memory;

#[cfg(test)]
mod tests;

pub mod config;
pub mod factory;

use anyhow::Result;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Durable string key/value store holding the session credentials. Each key is
/// written independently; there is no cross-key transaction.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}

pub enum UnionStorage {
    File(FileStorage),
    Memory(MemoryStorage),
}

impl Storage for UnionStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Self::File(storage) => storage.get(key),
            Self::Memory(storage) => storage.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::File(storage) => storage.set(key, value),
            Self::Memory(storage) => storage.set(key, value),
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        match self {
            Self::File(storage) => storage.delete(key),
            Self::Memory(storage) => storage.delete(key),
        }
    }
}
