//! Command-line interface for blockdeploy.
//!
//! # Commands
//!
//! - `deploy` - Publish content blocks in dependency order
//! - `plan` - Print the publish order without publishing
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - Enable debug output
//! - `--quiet` / `-q` - Only report errors
//! - `--log-level <LEVEL>` - `error`, `warn`, `info`, `debug` or `trace`
//!   (env `LOG_LEVEL`)
//! - `--config` / `-c` - Project config file (default
//!   `<workspace>/blockdeploy.toml`)
//!
//! # Execution
//!
//! [`Cli::execute`] loads the project file, installs the log subscriber,
//! merges flags over the file, and hands a [`CommandContext`] to the
//! subcommand. Configuration errors are therefore reported before any network
//! request is made.
//!
//! # Examples
//!
//! ```bash
//! blockdeploy deploy                       # everything, settings from env
//! blockdeploy -v deploy --mode incremental # changed blocks, debug output
//! blockdeploy plan --prefix stg_           # dry run
//! ```

mod common;
mod deploy;
mod plan;

pub use common::{CommandContext, CommandExecutor, DeployArgs, SelectedSource};
pub use deploy::DeployCommand;
pub use plan::PlanCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DeploySettings, FileConfig};
use crate::logging::{self, LogSettings};

/// Top-level command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "blockdeploy",
    about = "Deploy content block templates to a content store in dependency order",
    version,
    long_about = "blockdeploy publishes content block templates, ordering them so that every \
                  block is created after the blocks it references and refusing to publish \
                  anything when a reference is missing or circular."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output.
    ///
    /// Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log level: error, warn, info, debug or trace.
    ///
    /// Ignored when `--verbose` or `--quiet` is given, and overridden by
    /// `ACTIONS_STEP_DEBUG=true`. An unknown value falls back to info.
    #[arg(long, global = true, env = "LOG_LEVEL", value_name = "LEVEL")]
    log_level: Option<String>,

    /// Path to the project config file.
    ///
    /// Defaults to `blockdeploy.toml` in the workspace when present.
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Publish content blocks to the content store
    Deploy(DeployCommand),

    /// Print the order `deploy` would publish in, without publishing
    Plan(PlanCommand),
}

impl Commands {
    fn args(&self) -> &DeployArgs {
        match self {
            Self::Deploy(cmd) => &cmd.args,
            Self::Plan(cmd) => &cmd.args,
        }
    }
}

impl Cli {
    /// Run the selected command.
    ///
    /// # Errors
    ///
    /// Returns configuration, resolution and store errors unchanged for
    /// [`user_friendly_error`](crate::core::user_friendly_error) to render.
    pub async fn execute(self) -> Result<()> {
        let args = self.command.args();
        let file = FileConfig::load_with_optional(self.config.as_deref(), &args.workspace()).await?;

        logging::init(&self.log_settings(&file))?;

        let settings = DeploySettings::resolve(args.to_overrides(), file)?;
        let context = CommandContext::from_settings(settings)?;

        match self.command {
            Commands::Deploy(cmd) => cmd.execute_with_context(context).await,
            Commands::Plan(cmd) => cmd.execute_with_context(context).await,
        }
    }

    /// Log settings from the global flags, the environment and `file`.
    #[must_use]
    pub fn log_settings(&self, file: &FileConfig) -> LogSettings {
        LogSettings::resolve(
            self.log_level.as_deref().or(file.log_level.as_deref()),
            self.verbose,
            self.quiet,
            logging::step_debug_enabled(),
        )
    }
}
