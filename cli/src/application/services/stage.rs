//! Application service: stage the module and inject the provider block.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::ports::{
    LocalFs, ModuleStager, ProgressReporter, StageRequest, StagedModule,
};
use crate::domain::provider::{PROVIDERS_FILE_MODE, PROVIDERS_FILE_NAME, ProviderSettings};

/// Inputs for `stage_module`.
pub struct StageOptions<'a> {
    pub root: &'a Path,
    pub module_path: &'a str,
    pub name_prefix: &'a str,
    pub plan_file: &'a str,
    pub keep: bool,
    pub provider: &'a ProviderSettings,
}

/// Copy the module into a fresh directory and write `providers.tf` into it.
///
/// # Errors
///
/// Returns an error if staging fails or `providers.tf` cannot be written; the
/// underlying I/O cause is kept in the chain.
pub async fn stage_module(
    stager: &impl ModuleStager,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    opts: &StageOptions<'_>,
) -> Result<StagedModule> {
    reporter.step(&format!("Staging module from {}", opts.root.display()));
    let staged = stager
        .stage(&StageRequest {
            root: opts.root,
            module_path: opts.module_path,
            name_prefix: opts.name_prefix,
            plan_file: opts.plan_file,
            keep: opts.keep,
        })
        .await?;
    debug!(path = %staged.module_dir.display(), kept = staged.kept, "staged module");

    let providers = staged.module_dir.join(PROVIDERS_FILE_NAME);
    if fs.exists(&providers) {
        reporter.warn(&format!(
            "Module already ships {PROVIDERS_FILE_NAME}; replacing it in the staged copy"
        ));
    }
    fs.write_with_mode(&providers, &opts.provider.render(), PROVIDERS_FILE_MODE)
        .with_context(|| format!("Failed to write {PROVIDERS_FILE_NAME}"))?;
    reporter.success(&format!("Module staged at {}", staged.module_dir.display()));
    Ok(staged)
}
