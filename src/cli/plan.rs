//! Show the publish order without publishing.
//!
//! Runs every check `deploy` runs (store listing, missing references, cycles)
//! and prints the remote block names one per line in the order `deploy`
//! would publish them.

use anyhow::Result;
use clap::Args;

use super::common::{CommandContext, CommandExecutor, DeployArgs};

/// Command to print the publish order (dry run).
#[derive(Args, Debug, Clone)]
pub struct PlanCommand {
    #[command(flatten)]
    pub args: DeployArgs,
}

impl CommandExecutor for PlanCommand {
    async fn execute_with_context(self, context: CommandContext) -> Result<()> {
        let source = context.source()?;
        for name in context.deployer.plan(&source).await? {
            println!("{name}");
        }
        Ok(())
    }
}
