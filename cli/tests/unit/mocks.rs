//! Shared mock infrastructure for unit tests.
//!
//! Hand-written port implementations that record what the service asked
//! for so tests can assert on ordering and arguments.

#![allow(dead_code, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::Result;
use pnc_harness::application::ports::{
    CommandRunner, EnvSource, ModuleStager, ProgressReporter, StageRequest, StagedModule,
    Terraform,
};
use pnc_harness::domain::provider::PROVIDERS_FILE_NAME;
use pnc_harness::domain::{Credentials, ProvisioningRequest};
use pnc_harness::infra::stage::TempDirStager;

use crate::helpers::ok_output;

// ── Reporter ─────────────────────────────────────────────────────────────────

pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}

/// Records every event as `("step" | "success" | "warn", message)`.
#[derive(Default)]
pub struct RecordingReporter {
    pub warnings: RefCell<Vec<String>>,
    pub events: RefCell<Vec<(&'static str, String)>>,
}

impl RecordingReporter {
    fn record(&self, kind: &'static str, message: &str) {
        self.events.borrow_mut().push((kind, message.to_string()));
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.record("step", message);
    }
    fn success(&self, message: &str) {
        self.record("success", message);
    }
    fn warn(&self, message: &str) {
        self.record("warn", message);
        self.warnings.borrow_mut().push(message.to_string());
    }
}

// ── Environment ──────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryEnv {
    vars: HashMap<String, String>,
}

impl MemoryEnv {
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }
}

impl EnvSource for MemoryEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

// ── Stager ───────────────────────────────────────────────────────────────────

/// Delegates to `TempDirStager` and counts calls.
#[derive(Default)]
pub struct CountingStager {
    pub calls: Cell<u32>,
    pub staged: RefCell<Vec<PathBuf>>,
}

impl ModuleStager for CountingStager {
    async fn stage(&self, request: &StageRequest<'_>) -> Result<StagedModule> {
        self.calls.set(self.calls.get() + 1);
        let staged = TempDirStager.stage(request).await?;
        self.staged.borrow_mut().push(staged.module_dir.clone());
        Ok(staged)
    }
}

// ── Terraform ────────────────────────────────────────────────────────────────

/// Scripted `Terraform` port.
///
/// `init` and `plan` pop canned outputs from their queues and fall back to
/// success when a queue is empty. A successful `plan` writes the plan file
/// unless `write_plan` is false.
pub struct ScriptedTerraform {
    pub calls: RefCell<Vec<String>>,
    pub init_outputs: RefCell<VecDeque<Output>>,
    pub plan_outputs: RefCell<VecDeque<Output>>,
    pub write_plan: bool,
    /// `providers.tf` content observed at each `init`.
    pub providers_at_init: RefCell<Vec<Option<String>>>,
    pub plan_requests: RefCell<Vec<ProvisioningRequest>>,
    pub seen_credentials: RefCell<Vec<Credentials>>,
}

impl Default for ScriptedTerraform {
    fn default() -> Self {
        Self {
            calls: RefCell::default(),
            init_outputs: RefCell::default(),
            plan_outputs: RefCell::default(),
            write_plan: true,
            providers_at_init: RefCell::default(),
            plan_requests: RefCell::default(),
            seen_credentials: RefCell::default(),
        }
    }
}

impl ScriptedTerraform {
    pub fn with_init(self, outputs: impl IntoIterator<Item = Output>) -> Self {
        self.init_outputs.borrow_mut().extend(outputs);
        self
    }

    pub fn with_plan(self, outputs: impl IntoIterator<Item = Output>) -> Self {
        self.plan_outputs.borrow_mut().extend(outputs);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Terraform for ScriptedTerraform {
    async fn version(&self) -> Result<String> {
        self.calls.borrow_mut().push("version".to_string());
        Ok("Terraform v1.9.8".to_string())
    }

    async fn init(&self, dir: &Path, credentials: &Credentials) -> Result<Output> {
        self.calls.borrow_mut().push("init".to_string());
        self.seen_credentials.borrow_mut().push(credentials.clone());
        self.providers_at_init
            .borrow_mut()
            .push(std::fs::read_to_string(dir.join(PROVIDERS_FILE_NAME)).ok());
        Ok(self
            .init_outputs
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| ok_output(b"Terraform has been successfully initialized!")))
    }

    async fn plan(
        &self,
        dir: &Path,
        request: &ProvisioningRequest,
        plan_file: &str,
        _credentials: &Credentials,
    ) -> Result<Output> {
        self.calls.borrow_mut().push("plan".to_string());
        self.plan_requests.borrow_mut().push(request.clone());
        let output = self
            .plan_outputs
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| ok_output(b"Plan: 12 to add, 0 to change, 0 to destroy."));
        if output.status.success() && self.write_plan {
            std::fs::write(dir.join(plan_file), b"tfplan").expect("write plan file");
        }
        Ok(output)
    }
}

// ── Command runner ───────────────────────────────────────────────────────────

/// One recorded process invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub dir: Option<PathBuf>,
    pub envs: Vec<(String, String)>,
}

/// Records every call and answers with a fixed output.
pub struct RecordingRunner {
    pub calls: RefCell<Vec<RecordedCall>>,
    response: Output,
}

impl RecordingRunner {
    pub fn new(response: Output) -> Self {
        Self {
            calls: RefCell::default(),
            response,
        }
    }

    pub fn last(&self) -> RecordedCall {
        self.calls.borrow().last().cloned().expect("at least one call")
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.calls.borrow_mut().push(RecordedCall {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            dir: None,
            envs: Vec::new(),
        });
        Ok(self.response.clone())
    }

    async fn run_in(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
        envs: &[(&str, &str)],
    ) -> Result<Output> {
        self.calls.borrow_mut().push(RecordedCall {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            dir: Some(dir.to_path_buf()),
            envs: envs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        });
        Ok(self.response.clone())
    }
}

/// Lets a test keep the runner to inspect after handing it to an adapter.
impl CommandRunner for &RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        (**self).run(program, args).await
    }

    async fn run_in(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
        envs: &[(&str, &str)],
    ) -> Result<Output> {
        (**self).run_in(program, args, dir, envs).await
    }
}
