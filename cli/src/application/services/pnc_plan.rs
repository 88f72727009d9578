//! Application service: validate the PNC module with `terraform init` + `plan`.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::application::ports::{FileHasher, LocalFs, ModuleStager, ProgressReporter, Terraform};
use crate::application::services::retry::run_with_retries;
use crate::application::services::stage::{StageOptions, stage_module};
use crate::domain::module::{TfSource, declared_variables};
use crate::domain::provider::PROVIDERS_FILE_NAME;
use crate::domain::unique_id::unique_id;
use crate::domain::{
    CredentialCheck, HarnessConfig, PlanOutcome, PlanReport, ProvisioningRequest, RetryPolicy,
    StageError, TerraformError,
};

/// Inputs for `run_plan`.
pub struct PlanOptions<'a> {
    pub root: &'a Path,
    pub module_path: &'a str,
    /// Overrides the generated run identifier.
    pub name_prefix: Option<&'a str>,
    pub keep: bool,
    pub config: &'a HarnessConfig,
    pub policy: &'a RetryPolicy,
}

/// Stage the module, write the provider block, then run init and plan.
///
/// Returns `PlanOutcome::Skipped` without touching the filesystem or spawning
/// anything when a credential is missing. Every other failure is an `Err`
/// carrying the originating message.
///
/// # Errors
///
/// Returns an error if staging, request validation, `terraform init`, or
/// `terraform plan` fails.
pub async fn run_plan(
    credentials: &CredentialCheck,
    stager: &impl ModuleStager,
    fs: &(impl LocalFs + FileHasher),
    terraform: &impl Terraform,
    reporter: &impl ProgressReporter,
    opts: &PlanOptions<'_>,
) -> Result<PlanOutcome> {
    let creds = match credentials {
        CredentialCheck::Present(creds) => creds,
        CredentialCheck::Missing { missing } => {
            info!(?missing, "credentials missing, skipping");
            return Ok(PlanOutcome::Skipped {
                missing: missing.iter().map(|s| (*s).to_string()).collect(),
            });
        }
    };

    let started_at = Utc::now();
    let name_prefix = opts.name_prefix.map_or_else(unique_id, str::to_owned);
    let plan_file = opts.config.terraform.plan_file.as_str();
    info!(name_prefix = %name_prefix, "starting PNC plan run");

    let version = terraform.version().await?;
    reporter.success(&format!("Using {version}"));

    let staged = stage_module(
        stager,
        fs,
        reporter,
        &StageOptions {
            root: opts.root,
            module_path: opts.module_path,
            name_prefix: &name_prefix,
            plan_file,
            keep: opts.keep,
            provider: &opts.config.provider,
        },
    )
    .await?;
    let dir = staged.module_dir.as_path();

    let request = ProvisioningRequest::new(&name_prefix, &opts.config.inputs)?;
    let sources: Vec<TfSource> = fs
        .read_tf_sources(dir)?
        .into_iter()
        .filter(|s| s.file_name != PROVIDERS_FILE_NAME)
        .collect();
    if sources.is_empty() {
        return Err(StageError::NoConfiguration(dir.to_path_buf()).into());
    }
    request.ensure_declared(&declared_variables(&sources)?)?;

    let plan_path = dir.join(plan_file);
    if fs.exists(&plan_path) {
        return Err(StageError::PlanFileExists(plan_path).into());
    }

    reporter.step("Running terraform init");
    let init = run_with_retries(opts.policy, "init", reporter, move || {
        terraform.init(dir, creds)
    })
    .await?;
    reporter.success("terraform init complete");

    reporter.step("Running terraform plan");
    let request_ref = &request;
    let plan = run_with_retries(opts.policy, "plan", reporter, move || {
        terraform.plan(dir, request_ref, plan_file, creds)
    })
    .await?;

    if !fs.exists(&plan_path) {
        return Err(TerraformError::PlanFileMissing(plan_path).into());
    }
    let plan_sha256 = fs.sha256_file(&plan_path)?;
    reporter.success(&format!("terraform plan written to {}", plan_path.display()));
    info!(
        name_prefix = %name_prefix,
        init_attempts = init.attempts,
        plan_attempts = plan.attempts,
        "PNC plan run passed"
    );

    Ok(PlanOutcome::Passed(PlanReport {
        name_prefix,
        staged_dir: staged.module_dir.clone(),
        kept: staged.kept,
        plan_file: plan_path,
        plan_sha256,
        init_attempts: init.attempts,
        plan_attempts: plan.attempts,
        started_at,
        finished_at: Utc::now(),
    }))
}
