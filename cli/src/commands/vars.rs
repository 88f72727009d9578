//! `pnc-harness vars`: print the variables a plan run would pass.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::domain::ProvisioningRequest;
use crate::domain::unique_id::unique_id;

/// Arguments for the vars command.
#[derive(Args, Debug)]
pub struct VarsArgs {
    /// Fixed name prefix instead of a generated 6-character ID
    #[arg(long)]
    pub name_prefix: Option<String>,

    /// Print sensitive values such as bgp_password in clear
    #[arg(long)]
    pub show_sensitive: bool,
}

/// Run the vars command. Output is always JSON.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or the inputs are invalid.
pub fn run(app: &AppContext, args: &VarsArgs) -> Result<ExitCode> {
    let config = app.config_store.load()?;
    let name_prefix = args.name_prefix.clone().unwrap_or_else(unique_id);
    let request = ProvisioningRequest::new(&name_prefix, &config.inputs)?;
    let request = if args.show_sensitive {
        request
    } else {
        request.redacted()
    };
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(ExitCode::SUCCESS)
}
