//! `pnc-harness plan`: stage the module and run terraform init + plan.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::pnc_plan::{PlanOptions, run_plan};
use crate::domain::{CredentialCheck, HarnessConfig, PlanOutcome, PlanReport, validate_config};
use crate::infra::fs::LocalFs;
use crate::infra::stage::TempDirStager;
use crate::infra::terraform::TerraformCli;
use crate::output::TerminalReporter;

use super::ModuleArgs;

/// Arguments for the plan command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub module: ModuleArgs,

    /// Terraform binary (overrides terraform.binary)
    #[arg(long)]
    pub terraform_bin: Option<String>,

    /// Retries for transient errors (overrides retry.max_retries)
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Seconds between retries (overrides retry.time_between_retries_secs)
    #[arg(long)]
    pub retry_delay_secs: Option<u64>,

    /// Leave the staged directory on disk after the run
    #[arg(long)]
    pub keep: bool,
}

impl PlanArgs {
    /// Layer flag overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut HarnessConfig) {
        if let Some(bin) = &self.terraform_bin {
            config.terraform.binary.clone_from(bin);
        }
        if let Some(n) = self.max_retries {
            config.retry.max_retries = n;
        }
        if let Some(secs) = self.retry_delay_secs {
            config.retry.time_between_retries_secs = secs;
        }
    }
}

/// Run the plan command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the run fails.
pub async fn run(app: &AppContext, args: &PlanArgs) -> Result<ExitCode> {
    // Skip before anything else so a missing config never masks it.
    if let CredentialCheck::Missing { .. } = &app.credentials {
        let outcome = skipped(&app.credentials);
        render(app, &outcome)?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = app.config_store.load()?;
    args.apply(&mut config);
    validate_config(&config)?;
    let policy = config.retry.to_policy()?;

    let terraform =
        TerraformCli::with_timeout(&config.terraform.binary, config.terraform.timeout());
    let reporter = TerminalReporter::new(&app.output);

    let outcome = run_plan(
        &app.credentials,
        &TempDirStager,
        &LocalFs,
        &terraform,
        &reporter,
        &PlanOptions {
            root: &args.module.root,
            module_path: &args.module.module_path,
            name_prefix: args.module.name_prefix.as_deref(),
            keep: args.keep,
            config: &config,
            policy: &policy,
        },
    )
    .await?;
    drop(reporter);

    render(app, &outcome)?;
    Ok(ExitCode::SUCCESS)
}

fn skipped(check: &CredentialCheck) -> PlanOutcome {
    let missing = match check {
        CredentialCheck::Missing { missing } => missing.iter().map(|s| (*s).to_string()).collect(),
        CredentialCheck::Present(_) => Vec::new(),
    };
    PlanOutcome::Skipped { missing }
}

fn render(app: &AppContext, outcome: &PlanOutcome) -> Result<()> {
    if app.is_json() {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }
    match outcome {
        PlanOutcome::Skipped { .. } => println!("{}", CredentialCheck::skip_message()),
        PlanOutcome::Passed(report) => render_report(app, report),
    }
    Ok(())
}

fn render_report(app: &AppContext, report: &PlanReport) {
    let out = &app.output;
    out.success("PNC plan passed");
    out.kv("name_prefix ", &report.name_prefix);
    out.kv("plan_file   ", &report.plan_file.display().to_string());
    out.kv("plan_sha256 ", &report.plan_sha256);
    out.kv(
        "attempts    ",
        &format!("init {}, plan {}", report.init_attempts, report.plan_attempts),
    );
    let elapsed = report.finished_at - report.started_at;
    out.kv("elapsed     ", &format!("{}s", elapsed.num_seconds()));
    if report.kept {
        out.info(&format!("Staged module kept at {}", report.staged_dir.display()));
    }
}
