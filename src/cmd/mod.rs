mod config;
mod delete;
mod get;
mod login;
mod logout;
mod register;
mod status;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use fintrack::client::factory::ClientFactory;
use fintrack::client::Client;
use fintrack::config::ConfigArgs;

#[async_trait]
pub trait RunCommand {
    async fn run(&self) -> Result<()>;
}

#[derive(Parser)]
#[command(author, version, about)]
pub struct App {
    /// Log level, one of `error`, `warn`, `info` or `debug`.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Config(config::ShowConfigArgs),
    Delete(delete::DeleteArgs),
    Get(get::GetArgs),
    Login(login::LoginArgs),
    Logout(logout::LogoutArgs),
    Register(register::RegisterArgs),
    Status(status::StatusArgs),
}

#[async_trait]
impl RunCommand for App {
    async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Config(args) => args.run().await,
            Commands::Delete(args) => args.run().await,
            Commands::Get(args) => args.run().await,
            Commands::Login(args) => args.run().await,
            Commands::Logout(args) => args.run().await,
            Commands::Register(args) => args.run().await,
            Commands::Status(args) => args.run().await,
        }
    }
}

fn build_client(config: &ConfigArgs) -> Result<Arc<Client>> {
    let ps = config.build_path_set()?;
    let client_factory = ClientFactory::load(&ps)?;
    client_factory.build_client()
}
