//! Algorithm identifiers used by the cipher engine and the codec.
//!
//! Every identifier parses from its lowercase name (case-insensitive) through
//! [`strum::EnumString`] and prints back through [`strum::Display`], so the
//! same spelling works on the command line and in caller-supplied settings.
//!
//! # Overview
//!
//! - [`CipherKind`]: block cipher and its key size
//! - [`BlockMode`]: chaining mode, which fixes the IV size together with the cipher
//! - [`HashAlgo`]: hash function behind tamper signatures
//! - [`SignatureScheme`]: what the signature covers
//! - [`Alphabet`]: base64 flavour of the wire string

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use strum::{Display, EnumString, IntoStaticStr};

/// Block size shared by every supported cipher, in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// Block cipher selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(ascii_case_insensitive)]
pub enum CipherKind {
    /// AES with a 128-bit key.
    #[strum(to_string = "aes-128", serialize = "aes128")]
    Aes128,

    /// AES with a 192-bit key.
    #[strum(to_string = "aes-192", serialize = "aes192")]
    Aes192,

    /// AES with a 256-bit key. Accepts the longest keys, so it is the default.
    #[default]
    #[strum(to_string = "aes-256", serialize = "aes256")]
    Aes256,

    /// Rijndael with a 128-bit block, keyed by length: the key decides
    /// between AES-128, AES-192 and AES-256 (see [`CipherKind::for_key_len`]).
    #[strum(to_string = "rijndael-128")]
    Rijndael128,
}

impl CipherKind {
    /// Maximum (and effective) key length in bytes.
    #[inline]
    #[must_use]
    pub const fn key_size(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 | Self::Rijndael128 => 32,
        }
    }

    /// Concrete cipher used with a key of `key_len` bytes.
    ///
    /// Fixed AES variants are returned unchanged. [`CipherKind::Rijndael128`]
    /// becomes the smallest AES variant whose key size covers `key_len`.
    #[must_use]
    pub const fn for_key_len(self, key_len: usize) -> Self {
        match self {
            Self::Rijndael128 if key_len <= 16 => Self::Aes128,
            Self::Rijndael128 if key_len <= 24 => Self::Aes192,
            Self::Rijndael128 => Self::Aes256,
            other => other,
        }
    }

    #[inline]
    #[must_use]
    pub const fn block_size(self) -> usize {
        AES_BLOCK_SIZE
    }
}

/// Block chaining mode.
///
/// CFB and OFB operate on full cipher blocks (the "n-bit" variants), CTR uses
/// a 128-bit big-endian counter seeded from the IV. CFB, OFB and CTR turn the
/// cipher into a keystream, so their ciphertext may have any length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BlockMode {
    Cbc,

    #[strum(to_string = "cfb", serialize = "ncfb")]
    Cfb,

    #[default]
    #[strum(to_string = "ofb", serialize = "nofb")]
    Ofb,

    Ctr,
}

impl BlockMode {
    /// IV length in bytes accepted by `cipher` running in this mode.
    ///
    /// Pure lookup; consulted once when a configuration is resolved.
    #[inline]
    #[must_use]
    pub const fn iv_size(self, cipher: CipherKind) -> usize {
        match self {
            Self::Cbc | Self::Cfb | Self::Ofb | Self::Ctr => cipher.block_size(),
        }
    }

    /// Whether ciphertext of any length decrypts in this mode. Only CBC
    /// needs whole blocks.
    #[inline]
    #[must_use]
    pub const fn is_keystream(self) -> bool {
        matches!(self, Self::Cfb | Self::Ofb | Self::Ctr)
    }
}

/// Hash function used for signatures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HashAlgo {
    Sha224,
    #[default]
    Sha256,
    Sha384,
    Sha512,
    Blake3,
}

/// What the envelope signature is computed over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SignatureScheme {
    /// `hash(sign_salt || plaintext)`, checked after decryption.
    ///
    /// Wire-compatible with envelopes produced by older deployments.
    Plaintext,

    /// `hmac(key = sign_salt, iv || ciphertext)`, checked before decryption.
    #[default]
    Ciphertext,
}

/// Base64 flavour used for both envelope parts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Alphabet {
    /// `A-Z a-z 0-9 + /` with `=` padding.
    #[default]
    Standard,

    /// `A-Z a-z 0-9 - _` with `=` padding.
    UrlSafe,
}

impl Alphabet {
    #[must_use]
    pub fn encode(self, data: &[u8]) -> String {
        match self {
            Self::Standard => STANDARD.encode(data),
            Self::UrlSafe => URL_SAFE.encode(data),
        }
    }

    /// Strict decode: non-alphabet characters, bad padding and non-canonical
    /// trailing bits are all errors.
    pub fn decode(self, data: &str) -> Result<Vec<u8>, base64::DecodeError> {
        match self {
            Self::Standard => STANDARD.decode(data),
            Self::UrlSafe => URL_SAFE.decode(data),
        }
    }

    /// Whether `c` can appear inside an encoded part.
    #[must_use]
    pub fn contains(self, c: char) -> bool {
        if c.is_ascii_alphanumeric() || c == '=' {
            return true;
        }

        match self {
            Self::Standard => matches!(c, '+' | '/'),
            Self::UrlSafe => matches!(c, '-' | '_'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_identifiers() {
        assert_eq!("aes-128".parse::<CipherKind>().unwrap(), CipherKind::Aes128);
        assert_eq!("AES-256".parse::<CipherKind>().unwrap(), CipherKind::Aes256);
        assert_eq!("Rijndael-128".parse::<CipherKind>().unwrap(), CipherKind::Rijndael128);
        assert_eq!("nofb".parse::<BlockMode>().unwrap(), BlockMode::Ofb);
        assert_eq!("CBC".parse::<BlockMode>().unwrap(), BlockMode::Cbc);
        assert_eq!("sha512".parse::<HashAlgo>().unwrap(), HashAlgo::Sha512);
        assert_eq!("url-safe".parse::<Alphabet>().unwrap(), Alphabet::UrlSafe);
        assert!("des".parse::<CipherKind>().is_err());
        assert!("ecb".parse::<BlockMode>().is_err());
    }

    #[test]
    fn test_display_uses_canonical_name() {
        assert_eq!(CipherKind::Aes192.to_string(), "aes-192");
        assert_eq!(BlockMode::Cfb.to_string(), "cfb");
        assert_eq!(HashAlgo::Blake3.to_string(), "blake3");
        assert_eq!(SignatureScheme::Ciphertext.to_string(), "ciphertext");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(CipherKind::default(), CipherKind::Aes256);
        assert_eq!(BlockMode::default(), BlockMode::Ofb);
        assert_eq!(HashAlgo::default(), HashAlgo::Sha256);
        assert_eq!(SignatureScheme::default(), SignatureScheme::Ciphertext);
    }

    #[test]
    fn test_iv_size_matches_block_size() {
        for mode in [BlockMode::Cbc, BlockMode::Cfb, BlockMode::Ofb, BlockMode::Ctr] {
            for cipher in [CipherKind::Aes128, CipherKind::Aes192, CipherKind::Aes256] {
                assert_eq!(mode.iv_size(cipher), AES_BLOCK_SIZE);
            }
        }
    }

    #[test]
    fn test_rijndael_follows_key_length() {
        assert_eq!(CipherKind::Rijndael128.for_key_len(5), CipherKind::Aes128);
        assert_eq!(CipherKind::Rijndael128.for_key_len(16), CipherKind::Aes128);
        assert_eq!(CipherKind::Rijndael128.for_key_len(17), CipherKind::Aes192);
        assert_eq!(CipherKind::Rijndael128.for_key_len(24), CipherKind::Aes192);
        assert_eq!(CipherKind::Rijndael128.for_key_len(32), CipherKind::Aes256);
        assert_eq!(CipherKind::Aes256.for_key_len(16), CipherKind::Aes256);
        assert_eq!(CipherKind::Aes128.for_key_len(32), CipherKind::Aes128);
    }

    #[test]
    fn test_only_cbc_needs_whole_blocks() {
        assert!(!BlockMode::Cbc.is_keystream());
        assert!(BlockMode::Cfb.is_keystream());
        assert!(BlockMode::Ofb.is_keystream());
        assert!(BlockMode::Ctr.is_keystream());
    }

    #[test]
    fn test_alphabet_membership() {
        assert!(Alphabet::Standard.contains('+'));
        assert!(!Alphabet::Standard.contains('-'));
        assert!(Alphabet::UrlSafe.contains('_'));
        assert!(!Alphabet::UrlSafe.contains('/'));
        assert!(!Alphabet::Standard.contains('.'));
        assert!(Alphabet::Standard.contains('='));
    }

    #[test]
    fn test_alphabet_strict_decode() {
        assert_eq!(Alphabet::Standard.decode("aGVsbG8=").unwrap(), b"hello");
        assert!(Alphabet::Standard.decode("aGVsbG8").is_err());
        assert!(Alphabet::Standard.decode("aGV*bG8=").is_err());
        assert!(Alphabet::UrlSafe.decode("+/+/").is_err());
    }
}
