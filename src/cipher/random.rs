//! Initialization vectors from the operating system CSPRNG.
//!
//! There is exactly one entropy source on every platform: [`OsRng`]
//! (`getrandom(2)`, `BCryptGenRandom`, ...). No userspace generator is ever
//! substituted. Nothing is selected at runtime: the `OnceLock` only makes the
//! source appear once in the debug log and names it for `sigcrypt info`.

use std::sync::OnceLock;

use rand::TryRngCore;
use rand::rngs::OsRng;
use tracing::debug;

use crate::error::{Error, Result};

static SOURCE: OnceLock<&'static str> = OnceLock::new();

/// Name of the entropy source backing [`generate_iv`].
pub fn source() -> &'static str {
    *SOURCE.get_or_init(|| {
        debug!(source = "os", "entropy source selected");
        "os"
    })
}

/// Returns `size` cryptographically strong random bytes.
///
/// # Errors
///
/// Returns [`Error::Entropy`] if the OS generator is unavailable.
pub fn generate_iv(size: usize) -> Result<Vec<u8>> {
    source();

    let mut iv = vec![0u8; size];
    OsRng.try_fill_bytes(&mut iv).map_err(|e| Error::Entropy(e.to_string()))?;

    Ok(iv)
}
