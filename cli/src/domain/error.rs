//! Failures of a plan run, grouped by the stage that raises them.
//!
//! `output::json::error_code` maps each enum to a stable code.

use std::path::PathBuf;

use thiserror::Error;

// ── Staging errors ────────────────────────────────────────────────────────────

/// Errors raised while copying the module into its isolated working directory.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("Module root not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error("Module path '{path}' does not exist under {}", .root.display())]
    ModulePathMissing { root: PathBuf, path: String },

    #[error("Plan file already present in staged directory: {}", .0.display())]
    PlanFileExists(PathBuf),

    #[error("No Terraform configuration (*.tf, *.tf.json) found in {}", .0.display())]
    NoConfiguration(PathBuf),

    #[error("Invalid JSON in {file}: {reason}")]
    InvalidJsonConfig { file: String, reason: String },
}

// ── Request errors ────────────────────────────────────────────────────────────

/// Errors in the provisioning request, detected before any remote call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Variables not declared by the module: {}", .0.join(", "))]
    UndeclaredVariables(Vec<String>),

    #[error("Invalid CIDR for {name}: '{value}' (expected a.b.c.d/n)")]
    InvalidCidr { name: String, value: String },

    #[error("Variable {0} must not be empty")]
    EmptyValue(String),

    #[error("Variable {name} must be positive, got {value}")]
    NonPositive { name: String, value: i64 },
}

// ── Terraform errors ──────────────────────────────────────────────────────────

/// Errors surfaced from the external `terraform` process.
#[derive(Debug, Error)]
pub enum TerraformError {
    #[error("terraform {subcommand} failed (exit code {code}):\n{output}")]
    CommandFailed {
        subcommand: String,
        code: String,
        output: String,
    },

    #[error(
        "terraform {subcommand} still failing after {attempts} attempts with a retryable error:\n{last_output}"
    )]
    RetriesExhausted {
        subcommand: String,
        attempts: u32,
        last_output: String,
    },

    #[error("terraform plan succeeded but wrote no plan file at {}", .0.display())]
    PlanFileMissing(PathBuf),
}

impl TerraformError {
    /// Name of the terraform subcommand this error originated from, if any.
    #[must_use]
    pub fn subcommand(&self) -> &str {
        match self {
            Self::CommandFailed { subcommand, .. } | Self::RetriesExhausted { subcommand, .. } => {
                subcommand
            }
            Self::PlanFileMissing(_) => "plan",
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to harness configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
