//! `pnc-harness stage`: stage the module with `providers.tf` and keep it.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::stage::{StageOptions, stage_module};
use crate::domain::unique_id::unique_id;
use crate::domain::validate_config;
use crate::infra::fs::LocalFs;
use crate::infra::stage::TempDirStager;
use crate::output::TerminalReporter;

use super::ModuleArgs;

/// Arguments for the stage command.
#[derive(Args, Debug)]
pub struct StageArgs {
    #[command(flatten)]
    pub module: ModuleArgs,
}

/// Run the stage command. The staged directory is always kept.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or staging fails.
pub async fn run(app: &AppContext, args: &StageArgs) -> Result<ExitCode> {
    let config = app.config_store.load()?;
    validate_config(&config)?;
    let name_prefix = args.module.name_prefix.clone().unwrap_or_else(unique_id);

    let reporter = TerminalReporter::new(&app.output);
    let staged = stage_module(
        &TempDirStager,
        &LocalFs,
        &reporter,
        &StageOptions {
            root: &args.module.root,
            module_path: &args.module.module_path,
            name_prefix: &name_prefix,
            plan_file: &config.terraform.plan_file,
            keep: true,
            provider: &config.provider,
        },
    )
    .await?;
    drop(reporter);

    if app.is_json() {
        let obj = serde_json::json!({
            "name_prefix": name_prefix,
            "staged_dir": staged.module_dir,
        });
        println!("{}", serde_json::to_string_pretty(&obj)?);
    } else {
        println!("{}", staged.module_dir.display());
    }
    Ok(ExitCode::SUCCESS)
}
