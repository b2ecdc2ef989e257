use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};
use crate::storage::config::StorageConfig;

use super::ClientOptions;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClientConfig {
    #[serde(default = "ClientConfig::default_server")]
    pub server: String,

    #[serde(default = "ClientConfig::default_timeout_secs")]
    pub timeout_secs: u64,

    /// Seconds before `exp` at which an access token is already treated as expired.
    #[serde(default = "ClientConfig::default_refresh_buffer_secs")]
    pub refresh_buffer_secs: u64,

    #[serde(default = "ClientConfig::default_refresh_wait_secs")]
    pub refresh_wait_secs: u64,

    #[serde(default = "ClientConfig::default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    #[serde(default = "ClientConfig::default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "StorageConfig::default")]
    pub storage: StorageConfig,
}

impl CommonConfig for ClientConfig {
    fn default() -> Self {
        Self {
            server: Self::default_server(),
            timeout_secs: Self::default_timeout_secs(),
            refresh_buffer_secs: Self::default_refresh_buffer_secs(),
            refresh_wait_secs: Self::default_refresh_wait_secs(),
            retry_delay_ms: Self::default_retry_delay_ms(),
            max_retries: Self::default_max_retries(),
            storage: StorageConfig::default(),
        }
    }

    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        // The url itself is validated by Client::new.
        self.server = expandenv("server", &self.server)?;
        if self.server.is_empty() {
            bail!("server cannot be empty");
        }

        if self.timeout_secs == 0 {
            bail!("timeout_secs cannot be zero");
        }
        if self.refresh_wait_secs == 0 {
            bail!("refresh_wait_secs cannot be zero");
        }

        self.storage.complete(ps).context("storage")?;
        Ok(())
    }
}

impl ClientConfig {
    pub fn default_server() -> String {
        match env::var("FINTRACK_API_BASE_URL") {
            Ok(url) if !url.is_empty() => url,
            _ => String::from("http://127.0.0.1:8080"),
        }
    }

    pub fn default_timeout_secs() -> u64 {
        10
    }

    pub fn default_refresh_buffer_secs() -> u64 {
        5
    }

    pub fn default_refresh_wait_secs() -> u64 {
        5
    }

    pub fn default_retry_delay_ms() -> u64 {
        1000
    }

    pub fn default_max_retries() -> u32 {
        1
    }

    pub fn options(&self) -> ClientOptions {
        ClientOptions {
            timeout: Duration::from_secs(self.timeout_secs),
            refresh_buffer_secs: self.refresh_buffer_secs,
            refresh_wait: Duration::from_secs(self.refresh_wait_secs),
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            max_retries: self.max_retries,
        }
    }
}
