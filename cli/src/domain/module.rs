//! Terraform module rules: which files are staged and which inputs exist.
//!
//! Pure functions only; callers read the files and pass contents in.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::StageError;

/// Default plan output file written inside the staged directory.
pub const DEFAULT_PLAN_FILE: &str = "plan.out";

/// Hidden files that are still part of a module.
const HIDDEN_ALLOWLIST: &[&str] = &[".terraform.lock.hcl", ".terraform-version"];

/// Local state and variable files never carried into a staged copy.
const STATE_AND_VARS: &[&str] = &[
    "terraform.tfstate",
    "terraform.tfstate.backup",
    "terraform.tfvars",
    "terraform.tfvars.json",
];

#[allow(clippy::expect_used)] // Pattern is a compile-time constant
static VARIABLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*variable\s+(?:"([^"]+)"|([A-Za-z_][A-Za-z0-9_-]*))\s*\{"#)
        .expect("valid variable block regex")
});

/// Configuration syntax Terraform loads from a module directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TfSyntax {
    /// `*.tf`
    Hcl,
    /// `*.tf.json`
    Json,
}

impl TfSyntax {
    /// Syntax of `file_name`, or `None` when Terraform ignores the file.
    #[must_use]
    pub fn of(file_name: &str) -> Option<Self> {
        if file_name.ends_with(".tf.json") {
            Some(Self::Json)
        } else if file_name.ends_with(".tf") {
            Some(Self::Hcl)
        } else {
            None
        }
    }
}

/// A top-level configuration file of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TfSource {
    pub file_name: String,
    pub content: String,
}

impl TfSource {
    #[must_use]
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// Location of the plan file relative to the copy root.
///
/// `module_path` is normalised so `"."`, `""` and `"./sub"` resolve the same
/// way the staged module directory does.
#[must_use]
pub fn staged_plan_path(module_path: &str, plan_file: &str) -> PathBuf {
    Path::new(module_path)
        .join(plan_file)
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect()
}

/// Decide whether a path (relative to the copy root) is copied.
///
/// `plan_path` comes from `staged_plan_path` and is excluded so a stale plan
/// never lands in a fresh stage.
#[must_use]
pub fn should_stage(relative: &Path, plan_path: &Path) -> bool {
    let mut components = relative.components().peekable();
    while let Some(component) = components.next() {
        let Component::Normal(name) = component else {
            continue;
        };
        let name = name.to_string_lossy();
        let is_last = components.peek().is_none();
        if name.starts_with('.') && !(is_last && HIDDEN_ALLOWLIST.contains(&name.as_ref())) {
            return false;
        }
        if is_last && STATE_AND_VARS.contains(&name.as_ref()) {
            return false;
        }
    }
    relative != plan_path
}

/// Collect variable declarations from `.tf` and `.tf.json` sources.
///
/// # Errors
///
/// Returns `StageError::InvalidJsonConfig` when a `.tf.json` file is not
/// valid JSON.
pub fn declared_variables<'a>(
    sources: impl IntoIterator<Item = &'a TfSource>,
) -> Result<BTreeSet<String>, StageError> {
    let mut names = BTreeSet::new();
    for source in sources {
        match TfSyntax::of(&source.file_name) {
            Some(TfSyntax::Hcl) => names.extend(hcl_variables(&source.content)),
            Some(TfSyntax::Json) => names.extend(json_variables(source)?),
            None => {}
        }
    }
    Ok(names)
}

fn hcl_variables(content: &str) -> impl Iterator<Item = String> + '_ {
    VARIABLE_BLOCK
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
}

/// Labels of the top-level `variable` block, which JSON syntax writes either
/// as an object keyed by name or as an array of such objects.
fn json_variables(source: &TfSource) -> Result<Vec<String>, StageError> {
    let doc: serde_json::Value =
        serde_json::from_str(&source.content).map_err(|e| StageError::InvalidJsonConfig {
            file: source.file_name.clone(),
            reason: e.to_string(),
        })?;
    let labels = |v: &serde_json::Value| -> Vec<String> {
        v.as_object()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default()
    };
    Ok(match doc.get("variable") {
        Some(serde_json::Value::Array(blocks)) => blocks.iter().flat_map(labels).collect(),
        Some(block) => labels(block),
        None => Vec::new(),
    })
}
