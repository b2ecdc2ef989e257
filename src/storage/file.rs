use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::filelock::{read_file_lock, remove_file_lock, write_file_lock};

use super::Storage;

/// Keeps every key in its own file under `dir`, each access guarded by a file lock
/// so that several processes can share one session.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("ensure storage directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            bail!("invalid storage key '{key}'");
        }
        Ok(self.dir.join(key))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        let data = match read_file_lock(&path).with_context(|| format!("read key '{key}'"))? {
            Some(data) => data,
            None => return Ok(None),
        };
        let value =
            String::from_utf8(data).with_context(|| format!("decode key '{key}' as utf-8"))?;
        Ok(Some(value))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        write_file_lock(&path, value.as_bytes()).with_context(|| format!("write key '{key}'"))
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        remove_file_lock(&path).with_context(|| format!("delete key '{key}'"))
    }
}
