use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs, io};

use anyhow::{bail, Context, Result};
use clap::Args;
use log::warn;
use serde::de::DeserializeOwned;

/// Directories the client reads configuration from and keeps its state in.
pub struct PathSet {
    pub config_path: PathBuf,
    pub data_path: PathBuf,
}

impl PathSet {
    pub fn new(config_path: Option<PathBuf>, data_path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(path) = config_path {
            path
        } else if let Ok(path) = env::var("FINTRACK_CONFIG") {
            PathBuf::from(path)
        } else {
            Self::home_dir()?.join(".config").join("fintrack")
        };

        let data_path = if let Some(path) = data_path {
            path
        } else if let Ok(path) = env::var("FINTRACK_DATA") {
            PathBuf::from(path)
        } else {
            Self::home_dir()?.join(".local").join("share").join("fintrack")
        };

        fs::create_dir_all(&config_path)
            .with_context(|| format!("ensure config directory: {}", config_path.display()))?;
        fs::create_dir_all(&data_path)
            .with_context(|| format!("ensure data directory: {}", data_path.display()))?;

        Ok(Self {
            config_path,
            data_path,
        })
    }

    pub fn load_config<T, F>(&self, name: &str, default_func: F) -> Result<T>
    where
        T: CommonConfig + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.config_path.join(format!("{name}.toml"));
        let mut cfg: T = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s).context("parse config toml")?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("Config file for {name} not found, using defaults");
                default_func()
            }
            Err(err) => {
                return Err(err).context(format!("read config file: {}", path.display()));
            }
        };

        cfg.complete(self).context("validate config")?;
        Ok(cfg)
    }

    fn home_dir() -> Result<PathBuf> {
        let dir = std::env::var_os("HOME") // Unix/Linux/macOS
            .or_else(|| std::env::var_os("USERPROFILE")) // Windows
            .map(PathBuf::from);
        match dir {
            Some(dir) => Ok(dir),
            None => {
                bail!("could not determine home directory, please specify config path manually")
            }
        }
    }
}

pub trait CommonConfig {
    fn default() -> Self;
    fn complete(&mut self, ps: &PathSet) -> Result<()>;
}

/// Command line flags shared by every subcommand to locate config and data.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// The config directory, default is `~/.config/fintrack`.
    #[arg(long)]
    pub config_path: Option<PathBuf>,

    /// The data directory where tokens are kept, default is `~/.local/share/fintrack`.
    #[arg(long)]
    pub data_path: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn build_path_set(&self) -> Result<PathSet> {
        PathSet::new(self.config_path.clone(), self.data_path.clone())
    }
}

/// See: [`shellexpand::full`].
pub fn expandenv(name: &str, s: impl AsRef<str>) -> Result<String> {
    let s =
        shellexpand::full(s.as_ref()).with_context(|| format!("expand env value for '{name}'"))?;
    Ok(s.to_string())
}

/// Parse a humantime duration such as `"5m"` or `"90s"`, naming the field on failure.
pub fn parse_duration(name: &str, s: &str) -> Result<Duration> {
    humantime::parse_duration(s).with_context(|| format!("parse duration for '{name}': '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(
            parse_duration("ttl", "5m").unwrap(),
            Duration::from_secs(300)
        );
        assert_eq!(
            parse_duration("ttl", "1h 30s").unwrap(),
            Duration::from_secs(3630)
        );
        assert!(parse_duration("ttl", "five minutes").is_err());
    }

    #[test]
    fn test_expandenv() {
        env::set_var("FINTRACK_TEST_EXPAND", "example.org");
        let value = expandenv("server", "https://$FINTRACK_TEST_EXPAND/api").unwrap();
        assert_eq!(value, "https://example.org/api");
    }
}
