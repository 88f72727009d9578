//! Domain types and validators for harness configuration.
//!
//! Pure functions only, no I/O.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::module::DEFAULT_PLAN_FILE;
use crate::domain::provider::{ProviderSettings, VALID_ENVIRONMENTS};
use crate::domain::request::PncInputs;
use crate::domain::retry::{DEFAULT_MAX_RETRIES, DEFAULT_TIME_BETWEEN_RETRIES, RetryPolicy};

/// Default per-invocation timeout for terraform.
pub const DEFAULT_TERRAFORM_TIMEOUT_SECS: u64 = 1800;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.pnc/config.yaml`.
///
/// Credentials are deliberately absent; they only come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct HarnessConfig {
    pub terraform: TerraformSettings,
    pub retry: RetrySettings,
    pub provider: ProviderSettings,
    pub inputs: PncInputs,
}

/// How the terraform binary is invoked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TerraformSettings {
    /// Binary name or path, e.g. `terraform` or `tofu`.
    pub binary: String,
    pub timeout_secs: u64,
    /// Plan output file, relative to the staged module directory.
    pub plan_file: String,
}

impl Default for TerraformSettings {
    fn default() -> Self {
        Self {
            binary: "terraform".to_string(),
            timeout_secs: DEFAULT_TERRAFORM_TIMEOUT_SECS,
            plan_file: DEFAULT_PLAN_FILE.to_string(),
        }
    }
}

impl TerraformSettings {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Retry settings for transient terraform errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub time_between_retries_secs: u64,
    /// Additional regexes treated as retryable.
    pub extra_patterns: Vec<String>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            time_between_retries_secs: DEFAULT_TIME_BETWEEN_RETRIES.as_secs(),
            extra_patterns: Vec::new(),
        }
    }
}

impl RetrySettings {
    /// Compile into a `RetryPolicy`.
    ///
    /// # Errors
    ///
    /// Returns an error if an extra pattern is not a valid regex.
    pub fn to_policy(&self) -> Result<RetryPolicy> {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_secs(self.time_between_retries_secs),
            &self.extra_patterns,
        )
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a loaded configuration.
///
/// # Errors
///
/// Returns an error on an unknown provider environment, an empty binary or
/// plan file name, or a plan file that escapes the staged directory.
pub fn validate_config(config: &HarnessConfig) -> Result<()> {
    let env = config.provider.environment.as_str();
    if !VALID_ENVIRONMENTS.contains(&env) {
        return Err(ConfigError::InvalidValue {
            key: "provider.environment".to_string(),
            value: env.to_string(),
            valid: VALID_ENVIRONMENTS.join(", "),
        }
        .into());
    }
    if config.terraform.binary.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "terraform.binary".to_string(),
            value: String::new(),
            valid: "a binary name or path".to_string(),
        }
        .into());
    }
    let plan_file = config.terraform.plan_file.as_str();
    if plan_file.is_empty()
        || plan_file.contains('/')
        || plan_file.contains('\\')
        || plan_file.starts_with('.')
    {
        return Err(ConfigError::InvalidValue {
            key: "terraform.plan_file".to_string(),
            value: plan_file.to_string(),
            valid: "a plain file name such as plan.out".to_string(),
        }
        .into());
    }
    if config.terraform.timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            key: "terraform.timeout_secs".to_string(),
            value: "0".to_string(),
            valid: "a positive number of seconds".to_string(),
        }
        .into());
    }
    for raw in &config.retry.extra_patterns {
        if regex::Regex::new(raw).is_err() {
            return Err(ConfigError::InvalidValue {
                key: "retry.extra_patterns".to_string(),
                value: raw.clone(),
                valid: "a valid regular expression".to_string(),
            }
            .into());
        }
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
