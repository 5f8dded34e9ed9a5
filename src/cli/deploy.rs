//! Publish content blocks to the content store.
//!
//! # Examples
//!
//! Deploy everything under `content_blocks/`:
//! ```bash
//! blockdeploy deploy --api-key "$KEY" --endpoint https://rest.iad-01.braze.com
//! ```
//!
//! Deploy only the blocks changed by a push, with a staging prefix:
//! ```bash
//! blockdeploy deploy --mode incremental --prefix stg_ --base "$BEFORE" --head "$GITHUB_SHA"
//! ```
//!
//! # Process
//!
//! 1. List the blocks already in the store
//! 2. Collect the files for the chosen mode
//! 3. Order them so every block follows the blocks it references
//! 4. Create or update each block in that order

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use super::common::{CommandContext, CommandExecutor, DeployArgs};

/// Command to publish content blocks.
#[derive(Args, Debug, Clone)]
pub struct DeployCommand {
    #[command(flatten)]
    pub args: DeployArgs,
}

impl CommandExecutor for DeployCommand {
    async fn execute_with_context(self, context: CommandContext) -> Result<()> {
        let source = context.source()?;
        let report = context.deployer.run(&source).await?;

        println!(
            "{} created {}, updated {}",
            "✓".green(),
            report.summary.created.len(),
            report.summary.updated.len()
        );
        Ok(())
    }
}
