//! Infrastructure implementation of the `Terraform` port.
//!
//! `TerraformCli<R>` routes all terraform CLI calls through a `CommandRunner`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, Terraform};
use crate::domain::{Credentials, ProvisioningRequest};
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};

/// Infrastructure adapter that routes terraform CLI calls through a `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct TerraformCli<R: CommandRunner> {
    binary: String,
    probe_runner: R,
    runner: R,
}

impl<R: CommandRunner> TerraformCli<R> {
    /// Create an adapter with explicit runner instances.
    ///
    /// `probe_runner` serves `version`; `runner` serves `init` and `plan`.
    pub fn new(binary: impl Into<String>, probe_runner: R, runner: R) -> Self {
        Self {
            binary: binary.into(),
            probe_runner,
            runner,
        }
    }

    async fn run_in_module(
        &self,
        args: &[&str],
        dir: &Path,
        credentials: &Credentials,
    ) -> Result<Output> {
        let mut envs = vec![("TF_IN_AUTOMATION", "1")];
        envs.extend(credentials.env_pairs());
        self.runner.run_in(&self.binary, args, dir, &envs).await
    }
}

impl TerraformCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn with_timeout(binary: impl Into<String>, timeout: Duration) -> Self {
        Self::new(
            binary,
            TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT),
            TokioCommandRunner::new(timeout),
        )
    }
}

/// Arguments for `terraform init`.
#[must_use]
pub fn init_args() -> Vec<String> {
    ["init", "-upgrade=false", "-no-color"]
        .map(str::to_string)
        .to_vec()
}

/// Arguments for `terraform plan`, vars in name order.
#[must_use]
pub fn plan_args(request: &ProvisioningRequest, plan_file: &str) -> Vec<String> {
    let mut args: Vec<String> = ["plan", "-input=false", "-lock=false"]
        .map(str::to_string)
        .to_vec();
    args.extend(request.to_var_args());
    args.push(format!("-out={plan_file}"));
    args.push("-no-color".to_string());
    args
}

impl<R: CommandRunner> Terraform for TerraformCli<R> {
    async fn version(&self) -> Result<String> {
        let output = self
            .probe_runner
            .run(&self.binary, &["version"])
            .await
            .with_context(|| format!("terraform binary '{}' is not usable", self.binary))?;
        if !output.status.success() {
            anyhow::bail!(
                "'{} version' failed: {}",
                self.binary,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().next().unwrap_or_default().trim().to_string())
    }

    async fn init(&self, dir: &Path, credentials: &Credentials) -> Result<Output> {
        let args = init_args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_in_module(&args, dir, credentials)
            .await
            .context("terraform init")
    }

    async fn plan(
        &self,
        dir: &Path,
        request: &ProvisioningRequest,
        plan_file: &str,
        credentials: &Credentials,
    ) -> Result<Output> {
        let args = plan_args(request, plan_file);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run_in_module(&args, dir, credentials)
            .await
            .context("terraform plan")
    }
}
