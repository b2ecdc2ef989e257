use anyhow::Result;
use async_trait::async_trait;
use clap::{Args, ValueEnum};
use fintrack::cache::config::CacheConfig;
use fintrack::client::config::ClientConfig;
use fintrack::config::{CommonConfig, ConfigArgs};
use fintrack::display::display_json;

use super::RunCommand;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigName {
    Client,
    Cache,
}

/// Display the effective configuration in JSON format.
#[derive(Args)]
pub struct ShowConfigArgs {
    /// Which configuration to show.
    #[arg(default_value = "client")]
    pub name: ConfigName,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for ShowConfigArgs {
    async fn run(&self) -> Result<()> {
        let ps = self.config.build_path_set()?;

        match self.name {
            ConfigName::Client => {
                let cfg = ps.load_config("client", ClientConfig::default)?;
                display_json(cfg)
            }
            ConfigName::Cache => {
                let cfg = ps.load_config("cache", CacheConfig::default)?;
                display_json(cfg)
            }
        }
    }
}
