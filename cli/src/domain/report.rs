//! Outcome of a plan run.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of `run_plan`: either skipped for lack of credentials or passed.
///
/// Failures are not an outcome; they are returned as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlanOutcome {
    Skipped { missing: Vec<String> },
    Passed(PlanReport),
}

/// Details of a successful init + plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanReport {
    pub name_prefix: String,
    /// Module working directory inside the staged copy.
    pub staged_dir: PathBuf,
    /// Whether `staged_dir` survives the process.
    pub kept: bool,
    pub plan_file: PathBuf,
    /// Lowercase hex SHA-256 of the plan file.
    pub plan_sha256: String,
    pub init_attempts: u32,
    pub plan_attempts: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Lowercase hex encoding.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(char::from(HEX[(b >> 4) as usize]));
        out.push(char::from(HEX[(b & 0xf) as usize]));
    }
    out
}
