//! Command implementations

pub mod config;
pub mod plan;
pub mod stage;
pub mod vars;
pub mod version;

use std::path::PathBuf;

use clap::Args;

/// Where the module lives and what the run is called.
#[derive(Args, Debug, Clone)]
pub struct ModuleArgs {
    /// Root folder copied into the staging directory
    #[arg(long, default_value = "..")]
    pub root: PathBuf,

    /// Module directory relative to the root
    #[arg(long, default_value = ".")]
    pub module_path: String,

    /// Fixed name prefix instead of a generated 6-character ID
    #[arg(long)]
    pub name_prefix: Option<String>,
}
