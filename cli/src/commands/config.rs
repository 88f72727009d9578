//! `pnc-harness config`: show the effective configuration.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or parsed.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
    }
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = app.config_store.load()?;
    let path = app.config_store.path()?;

    if app.is_json() {
        let obj = serde_json::json!({
            "path": path,
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&obj)?);
    } else {
        app.output.header("Configuration");
        app.output.kv("path", &path.display().to_string());
        println!();
        print!("{}", serde_yaml::to_string(&config)?);
    }
    Ok(ExitCode::SUCCESS)
}
