//! Infrastructure implementation of the `CommandRunner` port.

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::debug;

use crate::application::ports::CommandRunner;

/// Timeout for short probes such as `terraform version`.
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs processes with tokio, capturing stdout and stderr.
///
/// Children are spawned with `kill_on_drop`, so a run that hits the timeout
/// drops the pending wait and the process is killed.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn capture(&self, program: &str, cmd: &mut Command) -> Result<Output> {
        let child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                anyhow::anyhow!("{program} timed out after {}s", self.timeout.as_secs())
            })?
            .with_context(|| format!("waiting for {program}"))?;
        debug!(program, status = ?output.status, "process exited");
        Ok(output)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.capture(program, Command::new(program).args(args)).await
    }

    async fn run_in(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
        envs: &[(&str, &str)],
    ) -> Result<Output> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(dir);
        for (key, value) in envs {
            cmd.env(key, value);
        }
        self.capture(program, &mut cmd).await
    }
}
