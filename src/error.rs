//! Error type shared by every public operation of the library.

use thiserror::Error;

/// Errors produced while building or using a [`Codec`](crate::codec::Codec).
///
/// Configuration variants are raised once, at construction, and no codec
/// exists afterwards. Every decode failure collapses into [`Error::Rejected`]
/// so a caller (or an attacker) cannot tell a corrupted envelope from a
/// forged one.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration group carries no encryption key.
    #[error("no encryption key is defined in configuration group `{group}`")]
    MissingKey { group: String },

    /// The configuration group carries no (or an empty) signature salt.
    #[error("no signature salt is defined in configuration group `{group}`")]
    MissingSignSalt { group: String },

    /// The delimiter is empty or would collide with the base64 alphabet.
    #[error("invalid delimiter {delimiter:?} in configuration group `{group}`: {reason}")]
    InvalidDelimiter { group: String, delimiter: String, reason: &'static str },

    /// The registry has no settings under this name.
    #[error("configuration group `{0}` is not defined")]
    UnknownGroup(String),

    /// The OS random number generator failed.
    #[error("entropy source failure: {0}")]
    Entropy(String),

    /// The cipher primitive refused the key or IV length.
    #[error("cipher primitive rejected key or iv length")]
    Primitive,

    /// The envelope is malformed, truncated or tampered with.
    #[error("envelope rejected")]
    Rejected,
}

impl Error {
    /// True for errors that stop a codec from being constructed.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingKey { .. } | Self::MissingSignSalt { .. } | Self::InvalidDelimiter { .. } | Self::UnknownGroup(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
