//! The provisioning request: module input variables for a PNC plan.
//!
//! Pure functions only, no I/O.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::error::RequestError;

/// Variables whose values are masked when the request is displayed.
pub const SENSITIVE_VARS: &[&str] = &["bgp_password"];

const REDACTED: &str = "<redacted>";

// ── Values ───────────────────────────────────────────────────────────────────

/// A single module input value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum VarValue {
    Str(String),
    Int(i64),
    List(Vec<String>),
}

impl VarValue {
    /// Render as the right-hand side of a `-var name=value` argument.
    ///
    /// Top-level strings are passed raw; list elements are HCL-quoted.
    #[must_use]
    pub fn to_hcl(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(n) => n.to_string(),
            Self::List(items) => {
                let quoted: Vec<String> = items.iter().map(|s| hcl_quote(s)).collect();
                format!("[{}]", quoted.join(", "))
            }
        }
    }
}

fn hcl_quote(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

// ── Inputs ───────────────────────────────────────────────────────────────────

/// Fixed PNC module inputs, everything except the per-run `name_prefix`.
///
/// Defaults are the reference values the module is validated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PncInputs {
    pub do_region: String,
    pub mp_contract_term_months: i64,
    pub mcr_port_bandwidth_in_mbps: i64,
    pub vxc_bandwidth_in_mbps: i64,
    pub mp_do_location: String,
    pub mp_aws_location: String,
    pub aws_region_full_name: String,
    pub aws_vgw_id: String,
    pub do_vpc_ids: Vec<String>,
    pub bgp_password: String,
    pub diversity_zone: String,
    pub do_local_router_ip: String,
    pub do_peer_router_ip: String,
}

impl Default for PncInputs {
    fn default() -> Self {
        Self {
            do_region: "sfo".to_string(),
            mp_contract_term_months: 1,
            mcr_port_bandwidth_in_mbps: 1000,
            vxc_bandwidth_in_mbps: 1000,
            mp_do_location: "Digital Realty New York JFK12 (NYC1)".to_string(),
            mp_aws_location: "CoreSite NY1".to_string(),
            aws_region_full_name: "US East (N. Virginia) (us-east-1)".to_string(),
            aws_vgw_id: "vgw-test123".to_string(),
            do_vpc_ids: vec!["test123".to_string()],
            bgp_password: "test123".to_string(),
            diversity_zone: "red".to_string(),
            do_local_router_ip: "169.254.0.1/29".to_string(),
            do_peer_router_ip: "169.254.0.6/29".to_string(),
        }
    }
}

impl PncInputs {
    /// Check field-level constraints.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), RequestError> {
        for (name, value) in [
            ("do_region", &self.do_region),
            ("mp_do_location", &self.mp_do_location),
            ("mp_aws_location", &self.mp_aws_location),
            ("aws_region_full_name", &self.aws_region_full_name),
            ("aws_vgw_id", &self.aws_vgw_id),
            ("bgp_password", &self.bgp_password),
            ("diversity_zone", &self.diversity_zone),
        ] {
            require_non_empty(name, value)?;
        }
        if self.do_vpc_ids.is_empty() || self.do_vpc_ids.iter().any(String::is_empty) {
            return Err(RequestError::EmptyValue("do_vpc_ids".to_string()));
        }
        for (name, value) in [
            ("mp_contract_term_months", self.mp_contract_term_months),
            ("mcr_port_bandwidth_in_mbps", self.mcr_port_bandwidth_in_mbps),
            ("vxc_bandwidth_in_mbps", self.vxc_bandwidth_in_mbps),
        ] {
            if value <= 0 {
                return Err(RequestError::NonPositive {
                    name: name.to_string(),
                    value,
                });
            }
        }
        for (name, value) in [
            ("do_local_router_ip", &self.do_local_router_ip),
            ("do_peer_router_ip", &self.do_peer_router_ip),
        ] {
            if !is_ipv4_cidr(value) {
                return Err(RequestError::InvalidCidr {
                    name: name.to_string(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

fn require_non_empty(name: &str, value: &str) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        return Err(RequestError::EmptyValue(name.to_string()));
    }
    Ok(())
}

/// Returns `true` for `a.b.c.d/n` with octets 0–255 and a prefix of 0–32.
#[must_use]
pub fn is_ipv4_cidr(value: &str) -> bool {
    let Some((addr, prefix)) = value.split_once('/') else {
        return false;
    };
    let prefix_ok = !prefix.is_empty()
        && prefix.chars().all(|c| c.is_ascii_digit())
        && prefix.parse::<u8>().is_ok_and(|p| p <= 32);
    let octets: Vec<&str> = addr.split('.').collect();
    let addr_ok = octets.len() == 4
        && octets.iter().all(|o| {
            !o.is_empty()
                && o.len() <= 3
                && o.chars().all(|c| c.is_ascii_digit())
                && o.parse::<u8>().is_ok()
        });
    prefix_ok && addr_ok
}

// ── Request ──────────────────────────────────────────────────────────────────

/// The full variable set passed to `terraform plan`, ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProvisioningRequest {
    vars: BTreeMap<String, VarValue>,
}

impl ProvisioningRequest {
    /// Build a validated request for one run.
    ///
    /// # Errors
    ///
    /// Returns an error if `name_prefix` is empty or any input is invalid.
    pub fn new(name_prefix: &str, inputs: &PncInputs) -> Result<Self, RequestError> {
        require_non_empty("name_prefix", name_prefix)?;
        inputs.validate()?;

        let s = |v: &str| VarValue::Str(v.to_string());
        let vars = BTreeMap::from([
            ("name_prefix".to_string(), s(name_prefix)),
            ("do_region".to_string(), s(&inputs.do_region)),
            (
                "mp_contract_term_months".to_string(),
                VarValue::Int(inputs.mp_contract_term_months),
            ),
            (
                "mcr_port_bandwidth_in_mbps".to_string(),
                VarValue::Int(inputs.mcr_port_bandwidth_in_mbps),
            ),
            (
                "vxc_bandwidth_in_mbps".to_string(),
                VarValue::Int(inputs.vxc_bandwidth_in_mbps),
            ),
            ("mp_do_location".to_string(), s(&inputs.mp_do_location)),
            ("mp_aws_location".to_string(), s(&inputs.mp_aws_location)),
            (
                "aws_region_full_name".to_string(),
                s(&inputs.aws_region_full_name),
            ),
            ("aws_vgw_id".to_string(), s(&inputs.aws_vgw_id)),
            (
                "do_vpc_ids".to_string(),
                VarValue::List(inputs.do_vpc_ids.clone()),
            ),
            ("bgp_password".to_string(), s(&inputs.bgp_password)),
            ("diversity_zone".to_string(), s(&inputs.diversity_zone)),
            (
                "do_local_router_ip".to_string(),
                s(&inputs.do_local_router_ip),
            ),
            ("do_peer_router_ip".to_string(), s(&inputs.do_peer_router_ip)),
        ]);
        Ok(Self { vars })
    }

    /// Look up a single variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VarValue> {
        self.vars.get(name)
    }

    /// Variable names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Check every variable is declared by the target module.
    ///
    /// # Errors
    ///
    /// Returns `UndeclaredVariables` listing every name the module lacks.
    pub fn ensure_declared(&self, declared: &BTreeSet<String>) -> Result<(), RequestError> {
        let undeclared: Vec<String> = self
            .vars
            .keys()
            .filter(|name| !declared.contains(*name))
            .cloned()
            .collect();
        if undeclared.is_empty() {
            Ok(())
        } else {
            Err(RequestError::UndeclaredVariables(undeclared))
        }
    }

    /// Render as terraform CLI arguments: `-var name=value` pairs.
    #[must_use]
    pub fn to_var_args(&self) -> Vec<String> {
        self.vars
            .iter()
            .flat_map(|(name, value)| ["-var".to_string(), format!("{name}={}", value.to_hcl())])
            .collect()
    }

    /// Copy with sensitive values masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut vars = self.vars.clone();
        for name in SENSITIVE_VARS {
            if let Some(v) = vars.get_mut(*name) {
                *v = VarValue::Str(REDACTED.to_string());
            }
        }
        Self { vars }
    }
}
