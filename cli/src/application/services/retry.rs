//! Bounded retry loop around a single terraform subcommand.

use std::future::Future;
use std::process::Output;

use anyhow::Result;
use tracing::{info, warn};

use crate::application::ports::ProgressReporter;
use crate::domain::{RetryPolicy, TerraformError};

/// Successful output plus the number of attempts it took.
#[derive(Debug)]
pub struct RetryOutcome {
    pub output: Output,
    pub attempts: u32,
}

/// Run `op` until it exits zero, retrying only failures the policy classifies
/// as transient.
///
/// Spawn and timeout errors from `op` are returned immediately.
///
/// # Errors
///
/// Returns `TerraformError::CommandFailed` for a non-retryable failure and
/// `TerraformError::RetriesExhausted` once `policy.max_attempts()` is reached.
pub async fn run_with_retries<F, Fut>(
    policy: &RetryPolicy,
    subcommand: &str,
    reporter: &impl ProgressReporter,
    mut op: F,
) -> Result<RetryOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Output>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 0;
    loop {
        attempt += 1;
        info!(subcommand, attempt, max_attempts, "running terraform");
        let output = op().await?;
        if output.status.success() {
            return Ok(RetryOutcome {
                output,
                attempts: attempt,
            });
        }

        let text = combined_output(&output);
        match policy.classify(&text) {
            Some(description) if attempt < max_attempts => {
                warn!(subcommand, attempt, description, "retryable terraform error");
                reporter.warn(&format!(
                    "terraform {subcommand}: {description} Retrying in {}s ({attempt}/{max_attempts})",
                    policy.time_between_retries.as_secs()
                ));
                tokio::time::sleep(policy.time_between_retries).await;
            }
            Some(_) => {
                return Err(TerraformError::RetriesExhausted {
                    subcommand: subcommand.to_string(),
                    attempts: attempt,
                    last_output: text,
                }
                .into());
            }
            None => {
                return Err(TerraformError::CommandFailed {
                    subcommand: subcommand.to_string(),
                    code: output
                        .status
                        .code()
                        .map_or_else(|| "none".to_string(), |c| c.to_string()),
                    output: text,
                }
                .into());
            }
        }
    }
}

/// Stdout followed by stderr, lossily decoded and trimmed.
#[must_use]
pub fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    match (stdout.trim(), stderr.trim()) {
        ("", err) => err.to_string(),
        (out, "") => out.to_string(),
        (out, err) => format!("{out}\n{err}"),
    }
}
