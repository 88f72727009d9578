//! Per-invocation state handed to every command as `&AppContext`.

use crate::application::ports::EnvSource;
use crate::domain::CredentialCheck;
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Whether stdout carries terminal lines or a single JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Global flags shared by every subcommand.
pub struct AppFlags {
    pub no_color: bool,
    pub quiet: bool,
    pub json: bool,
}

pub struct AppContext {
    pub output: OutputContext,
    pub mode: OutputMode,
    pub config_store: YamlConfigStore,
    /// Megaport credentials as found in the environment at startup.
    pub credentials: CredentialCheck,
}

impl AppContext {
    #[must_use]
    pub fn new(flags: &AppFlags, env: &impl EnvSource) -> Self {
        let mode = if flags.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        // stdout holds only the JSON document in JSON mode.
        let quiet = flags.quiet || flags.json;

        Self {
            output: OutputContext::new(flags.no_color, quiet, env),
            mode,
            config_store: YamlConfigStore,
            credentials: CredentialCheck::resolve(|key| env.var(key)),
        }
    }

    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }
}
