//! Megaport API credentials and the presence check that gates a run.
//!
//! Pure functions only. The lookup is passed in so callers can feed the
//! process environment or an in-memory map.

use std::fmt;

/// Environment variable holding the Megaport API access key.
pub const ACCESS_KEY_VAR: &str = "MEGAPORT_ACCESS_KEY";
/// Environment variable holding the Megaport API secret key.
pub const SECRET_KEY_VAR: &str = "MEGAPORT_SECRET_KEY";

/// Megaport API key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Environment pairs handed to the terraform process.
    #[must_use]
    pub fn env_pairs(&self) -> [(&'static str, &str); 2] {
        [
            (ACCESS_KEY_VAR, self.access_key.as_str()),
            (SECRET_KEY_VAR, self.secret_key.as_str()),
        ]
    }
}

/// Result of looking up both credential variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialCheck {
    Present(Credentials),
    /// One or both variables are unset or empty.
    Missing { missing: Vec<&'static str> },
}

impl CredentialCheck {
    /// Resolve credentials through `lookup`. Empty values count as missing.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let fetch = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let access = fetch(ACCESS_KEY_VAR);
        let secret = fetch(SECRET_KEY_VAR);

        match (access, secret) {
            (Some(access_key), Some(secret_key)) => Self::Present(Credentials {
                access_key,
                secret_key,
            }),
            (access, secret) => {
                let mut missing = Vec::new();
                if access.is_none() {
                    missing.push(ACCESS_KEY_VAR);
                }
                if secret.is_none() {
                    missing.push(SECRET_KEY_VAR);
                }
                Self::Missing { missing }
            }
        }
    }

    /// Message printed when the run is skipped.
    #[must_use]
    pub fn skip_message() -> String {
        format!("Skipping: {ACCESS_KEY_VAR} and {SECRET_KEY_VAR} must be set")
    }
}
