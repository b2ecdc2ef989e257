use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "StorageConfig::default_name")]
    pub name: StorageType,

    /// Directory of the file storage, default is `<data>/tokens`.
    #[serde(default = "StorageConfig::default_dir")]
    pub dir: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    #[serde(rename = "file")]
    File,
    #[serde(rename = "memory")]
    Memory,
}

impl CommonConfig for StorageConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            dir: Self::default_dir(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        self.dir = expandenv("dir", &self.dir)?;
        if self.dir.is_empty() {
            let path = ps.data_path.join("tokens");
            self.dir = format!("{}", path.display());
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn default_name() -> StorageType {
        StorageType::File
    }

    pub fn default_dir() -> String {
        String::new()
    }
}
