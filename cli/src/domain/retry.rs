//! Retry policy for transient terraform failures.
//!
//! The policy is data plus a classifier; the loop that sleeps and re-runs
//! lives in `application::services::retry`.

use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default pause between attempts.
pub const DEFAULT_TIME_BETWEEN_RETRIES: Duration = Duration::from_secs(5);

/// Known transient terraform/provider errors: `(pattern, description)`.
pub const DEFAULT_RETRYABLE_ERRORS: &[(&str, &str)] = &[
    (
        ".*read: connection reset by peer.*",
        "Failed to reach helm charts repository.",
    ),
    (".*transport is closing.*", "Failed to reach Kubernetes API."),
    (
        ".*unable to verify signature.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*unable to verify checksum.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*no provider exists with the given name.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*registry service is unreachable.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*Error installing provider.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*Failed to query available provider packages.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*timeout while waiting for plugin to start.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*timed out waiting for server handshake.*",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        "could not query provider registry for",
        "Failed to retrieve plugin due to transient network error.",
    ),
    (
        ".*Provider produced inconsistent result after apply.*",
        "Provider eventual consistency error.",
    ),
];

/// One retryable error class.
#[derive(Debug, Clone)]
pub struct RetryablePattern {
    pub regex: Regex,
    pub description: String,
}

/// Bounded retry policy keyed on an output classifier.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts are `max_retries + 1`.
    pub max_retries: u32,
    pub time_between_retries: Duration,
    pub patterns: Vec<RetryablePattern>,
}

impl RetryPolicy {
    /// Build a policy from the default error list plus `extra` patterns.
    ///
    /// # Errors
    ///
    /// Returns an error if any extra pattern is not a valid regex.
    pub fn new(max_retries: u32, time_between_retries: Duration, extra: &[String]) -> Result<Self> {
        let mut patterns = default_patterns();
        for raw in extra {
            let regex =
                Regex::new(raw).with_context(|| format!("invalid retry pattern '{raw}'"))?;
            patterns.push(RetryablePattern {
                regex,
                description: format!("Matched configured pattern '{raw}'."),
            });
        }
        Ok(Self {
            max_retries,
            time_between_retries,
            patterns,
        })
    }

    /// A policy that never retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            time_between_retries: Duration::ZERO,
            patterns: Vec::new(),
        }
    }

    /// Total attempts permitted, first try included.
    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Classify failure output. `Some(description)` means retryable.
    #[must_use]
    pub fn classify(&self, output: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.regex.is_match(output))
            .map(|p| p.description.as_str())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            time_between_retries: DEFAULT_TIME_BETWEEN_RETRIES,
            patterns: default_patterns(),
        }
    }
}

#[allow(clippy::expect_used)] // Patterns are compile-time constants
fn default_patterns() -> Vec<RetryablePattern> {
    DEFAULT_RETRYABLE_ERRORS
        .iter()
        .map(|(pattern, description)| RetryablePattern {
            regex: Regex::new(pattern).expect("valid built-in retry pattern"),
            description: (*description).to_string(),
        })
        .collect()
}
