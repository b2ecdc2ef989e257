use anyhow::Result;
use async_trait::async_trait;
use clap::Args;
use fintrack::client::resources::Collection;
use fintrack::config::ConfigArgs;

use super::{build_client, RunCommand};

/// Delete a resource from the server.
#[derive(Args)]
pub struct DeleteArgs {
    /// Type of resource to delete.
    pub resource: Collection,

    /// ID of the resource to delete.
    pub id: u64,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[async_trait]
impl RunCommand for DeleteArgs {
    async fn run(&self) -> Result<()> {
        let client = build_client(&self.config)?;
        client.delete(self.resource, self.id).await?;
        println!("Deleted {} {}", self.resource, self.id);
        Ok(())
    }
}
