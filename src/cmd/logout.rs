use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use fintrack::auth::Auth;
use fintrack::config::ConfigArgs;

use super::{build_client, RunCommand};

/// Revoke the session on the server and forget it locally.
#[derive(Args)]
pub struct LogoutArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for LogoutArgs {
    async fn run(&self) -> Result<()> {
        let client = build_client(&self.config)?;
        let auth = Auth::new(client);

        auth.logout().await;
        println!("Logged out");
        Ok(())
    }
}
