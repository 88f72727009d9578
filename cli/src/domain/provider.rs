//! The `providers.tf` fragment injected into every staged module.

use serde::{Deserialize, Serialize};

/// File name of the injected provider block.
pub const PROVIDERS_FILE_NAME: &str = "providers.tf";

/// Permission bits for `providers.tf` (owner rw, group/other r).
pub const PROVIDERS_FILE_MODE: u32 = 0o644;

/// Megaport environments accepted by the provider.
pub const VALID_ENVIRONMENTS: &[&str] = &["production", "staging", "development"];

/// Megaport provider settings rendered into `providers.tf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub environment: String,
    pub accept_purchase_terms: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            environment: "production".to_string(),
            accept_purchase_terms: true,
        }
    }
}

impl ProviderSettings {
    /// Render the provider block. Defaults produce the canonical fragment
    /// byte for byte, leading and trailing newline included.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "\nprovider \"megaport\" {{\n  environment           = \"{}\"\n  accept_purchase_terms = {}\n}}\n",
            self.environment, self.accept_purchase_terms
        )
    }
}
