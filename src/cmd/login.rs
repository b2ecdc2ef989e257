use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use fintrack::auth::Auth;
use fintrack::config::ConfigArgs;

use super::{build_client, RunCommand};

/// Sign in and keep the session for the following commands.
#[derive(Args)]
pub struct LoginArgs {
    #[arg(long, short)]
    pub email: String,

    #[arg(long, short)]
    pub password: String,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for LoginArgs {
    async fn run(&self) -> Result<()> {
        let client = build_client(&self.config)?;
        let auth = Auth::new(client);

        let state = auth.login(&self.email, &self.password).await?;
        match state.user {
            Some(user) => println!("Logged in as {} (user {})", user.email, user.id),
            None => println!("Logged in as {}", self.email),
        }
        Ok(())
    }
}
