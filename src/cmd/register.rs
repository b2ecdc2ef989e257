use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use fintrack::auth::Auth;
use fintrack::config::ConfigArgs;

use super::{build_client, RunCommand};

/// Create a new account. Run `login` afterwards to sign in.
#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long, short)]
    pub name: String,

    #[arg(long, short)]
    pub email: String,

    #[arg(long, short)]
    pub password: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for RegisterArgs {
    async fn run(&self) -> Result<()> {
        let client = build_client(&self.config)?;
        let auth = Auth::new(client);

        let resp = auth
            .register(&self.name, &self.email, &self.password)
            .await?;
        match resp.message {
            Some(message) if !message.is_empty() => println!("{message}"),
            _ => println!("Registered {}", self.email),
        }
        Ok(())
    }
}
