//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;
use crate::infra::env::ProcessEnv;

/// Plan-time validation harness for the Megaport PNC Terraform module
#[derive(Parser)]
#[command(
    name = "pnc-harness",
    version,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (NO_COLOR is also honoured)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug); PNC_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Stage the module and run terraform init + plan
    Plan(commands::plan::PlanArgs),

    /// Stage the module with providers.tf and leave it on disk
    Stage(commands::stage::StageArgs),

    /// Print the variables a plan run would pass
    Vars(commands::vars::VarsArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(
            &AppFlags {
                no_color,
                quiet,
                json,
            },
            &ProcessEnv,
        );

        match command {
            Command::Plan(args) => commands::plan::run(&app, &args).await,
            Command::Stage(args) => commands::stage::run(&app, &args).await,
            Command::Vars(args) => commands::vars::run(&app, &args),
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => Ok(commands::version::run(app.is_json())),
        }
    }
}
