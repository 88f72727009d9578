//! Seams between the plan services and the outside world: processes,
//! terraform, staging, the filesystem, the environment and the terminal.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;

use crate::domain::module::TfSource;
use crate::domain::{Credentials, HarnessConfig, ProvisioningRequest};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Spawns external programs and captures their output.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program in the current directory and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program in `dir` with extra environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// runner's timeout. On timeout, the child process must be killed.
    async fn run_in(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
        envs: &[(&str, &str)],
    ) -> Result<Output>;
}

// ── Terraform Port ────────────────────────────────────────────────────────────

/// The external provisioning tool, treated as an opaque subprocess contract.
///
/// `init` and `plan` return the raw process output; a non-zero exit is not an
/// `Err`. `Err` is reserved for spawn failures and timeouts.
#[allow(async_fn_in_trait)]
pub trait Terraform {
    /// Return the tool's version line, failing if the binary is unusable.
    async fn version(&self) -> Result<String>;
    /// Resolve providers and modules and set up local backend state in `dir`.
    async fn init(&self, dir: &Path, credentials: &Credentials) -> Result<Output>;
    /// Compute the proposed diff for `request` and write it to `plan_file`.
    async fn plan(
        &self,
        dir: &Path,
        request: &ProvisioningRequest,
        plan_file: &str,
        credentials: &Credentials,
    ) -> Result<Output>;
}

// ── Module Staging Port ───────────────────────────────────────────────────────

/// Parameters for copying a module into an isolated directory.
pub struct StageRequest<'a> {
    /// Folder whose tree is copied, e.g. `".."`.
    pub root: &'a Path,
    /// Module path relative to `root`, e.g. `"."`.
    pub module_path: &'a str,
    /// Used to name the temporary directory.
    pub name_prefix: &'a str,
    /// Excluded from the copy.
    pub plan_file: &'a str,
    /// Keep the directory after the returned guard drops.
    pub keep: bool,
}

/// A staged module directory.
///
/// Holds an opaque guard that removes the directory when dropped, unless the
/// module was staged with `keep`.
pub struct StagedModule {
    /// Working directory for terraform: `<tmp>/<module_path>`.
    pub module_dir: PathBuf,
    pub kept: bool,
    _guard: Option<Box<dyn Any>>,
}

impl StagedModule {
    /// A staged module removed when `guard` drops.
    #[must_use]
    pub fn temporary(module_dir: PathBuf, guard: Box<dyn Any>) -> Self {
        Self {
            module_dir,
            kept: false,
            _guard: Some(guard),
        }
    }

    /// A staged module that outlives the process.
    #[must_use]
    pub fn kept(module_dir: PathBuf) -> Self {
        Self {
            module_dir,
            kept: true,
            _guard: None,
        }
    }
}

/// Copies a module tree into a fresh directory, distinct per call.
#[allow(async_fn_in_trait)]
pub trait ModuleStager {
    async fn stage(&self, request: &StageRequest<'_>) -> Result<StagedModule>;
}

// ── Filesystem Ports ──────────────────────────────────────────────────────────

/// Abstracts the local filesystem operations services need.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    /// Write `content` to `path` and set its Unix permission bits to `mode`.
    fn write_with_mode(&self, path: &Path, content: &str, mode: u32) -> Result<()>;
    /// Every `*.tf` and `*.tf.json` file directly inside `dir`, sorted by name.
    fn read_tf_sources(&self, dir: &Path) -> Result<Vec<TfSource>>;
}

/// Digest of the written plan file, recorded in the report.
pub trait FileHasher {
    /// Lowercase hex SHA-256 of `path`.
    fn sha256_file(&self, path: &Path) -> Result<String>;
}

// ── Environment and Config Ports ──────────────────────────────────────────────

/// Read-only view of environment variables.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// Abstracts harness configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when no file exists.
    fn load(&self) -> Result<HarnessConfig>;
    /// Path the configuration is read from.
    fn path(&self) -> Result<PathBuf>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Run progress as seen by the user: a step starts, then succeeds, with
/// warnings (retries, replaced files) in between.
pub trait ProgressReporter {
    fn step(&self, message: &str);
    /// Completes the current step.
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
}
