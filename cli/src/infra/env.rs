//! Infrastructure implementation of the `EnvSource` port.

use crate::application::ports::EnvSource;

/// Reads the real process environment.
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}
