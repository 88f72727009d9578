//! Short random identifiers used to namespace cloud-side resource names.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hasher};

const BASE62: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Length of a generated identifier.
pub const UNIQUE_ID_LEN: usize = 6;

/// Generate a 6-character base62 identifier.
///
/// Collisions between concurrent runs are improbable, not impossible
/// (62^6 ≈ 5.7e10 values).
#[must_use]
pub fn unique_id() -> String {
    let mut hasher = RandomState::new().build_hasher();
    hasher.write_u128(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0),
    );
    hasher.write_u64(RandomState::new().build_hasher().finish());
    encode_base62(hasher.finish())
}

fn encode_base62(mut n: u64) -> String {
    let mut out = String::with_capacity(UNIQUE_ID_LEN);
    for _ in 0..UNIQUE_ID_LEN {
        #[allow(clippy::cast_possible_truncation)] // n % 62 < 62
        let idx = (n % 62) as usize;
        out.push(char::from(BASE62[idx]));
        n /= 62;
    }
    out
}

/// Returns `true` if `id` looks like a generated identifier.
#[must_use]
pub fn is_valid_unique_id(id: &str) -> bool {
    id.len() == UNIQUE_ID_LEN && id.chars().all(|c| c.is_ascii_alphanumeric())
}
