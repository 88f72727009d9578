//! Domain layer: pure types, rules, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod credentials;
pub mod error;
pub mod module;
pub mod provider;
pub mod report;
pub mod request;
pub mod retry;
pub mod unique_id;

pub use config::{HarnessConfig, validate_config};
pub use credentials::{CredentialCheck, Credentials};
pub use error::{ConfigError, RequestError, StageError, TerraformError};
pub use report::{PlanOutcome, PlanReport};
pub use request::{PncInputs, ProvisioningRequest, VarValue};
pub use retry::RetryPolicy;
