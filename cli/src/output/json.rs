//! `--json` failure document: `{"error": true, "message", "code"}`.

use anyhow::{Context, Result};

use crate::domain::{ConfigError, RequestError, StageError, TerraformError};

/// Pretty-printed failure document printed to stdout in `--json` mode.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let doc = serde_json::json!({ "error": true, "message": message, "code": code });
    serde_json::to_string_pretty(&doc).context("serializing error document")
}

/// Stable machine-readable code for an error chain.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if cause.is::<StageError>() {
            return "STAGE_FAILED";
        }
        if cause.is::<RequestError>() {
            return "INVALID_REQUEST";
        }
        if cause.is::<ConfigError>() {
            return "CONFIG_INVALID";
        }
        if let Some(tf) = cause.downcast_ref::<TerraformError>() {
            return match tf.subcommand() {
                "init" => "TERRAFORM_INIT_FAILED",
                _ => "TERRAFORM_PLAN_FAILED",
            };
        }
    }
    "INTERNAL"
}
