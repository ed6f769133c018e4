//! Tamper signatures carried in the first envelope part.
//!
//! Both signature flavours are rendered as lowercase hex, and the hex text
//! (not the raw digest) is what travels base64-encoded on the wire.
//!
//! - [`Signer::digest`]: `hash(sign_salt || plaintext)`, the compatible
//!   construction, verified after decryption.
//! - [`Signer::mac`]: HMAC keyed with the salt over `iv || ciphertext`,
//!   verified before anything is decrypted. BLAKE3 uses its native keyed mode
//!   with `blake3(sign_salt)` as key instead of HMAC.
//!
//! Verification always goes through [`subtle::ConstantTimeEq`].

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use crate::error::{Error, Result};
use crate::secret::SecretBytes;
use crate::types::HashAlgo;

pub struct Signer {
    algo: HashAlgo,
    salt: SecretBytes,
}

impl Signer {
    #[must_use]
    pub fn new(algo: HashAlgo, salt: SecretBytes) -> Self {
        Self { algo, salt }
    }

    /// Lowercase hex of `hash(sign_salt || plaintext)`.
    #[must_use]
    pub fn digest(&self, plaintext: &[u8]) -> String {
        let parts = [self.salt.expose_secret(), plaintext];

        match self.algo {
            HashAlgo::Sha224 => digest_hex::<Sha224>(&parts),
            HashAlgo::Sha256 => digest_hex::<Sha256>(&parts),
            HashAlgo::Sha384 => digest_hex::<Sha384>(&parts),
            HashAlgo::Sha512 => digest_hex::<Sha512>(&parts),
            HashAlgo::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                parts.iter().for_each(|part| {
                    hasher.update(part);
                });
                hex::encode(hasher.finalize().as_bytes())
            }
        }
    }

    /// Lowercase hex of the salt-keyed MAC over `iv || ciphertext`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Primitive`] if the MAC refuses the salt as key.
    pub fn mac(&self, iv: &[u8], ciphertext: &[u8]) -> Result<String> {
        let key = self.salt.expose_secret();
        let parts = [iv, ciphertext];

        match self.algo {
            HashAlgo::Sha224 => mac_hex::<Hmac<Sha224>>(key, &parts),
            HashAlgo::Sha256 => mac_hex::<Hmac<Sha256>>(key, &parts),
            HashAlgo::Sha384 => mac_hex::<Hmac<Sha384>>(key, &parts),
            HashAlgo::Sha512 => mac_hex::<Hmac<Sha512>>(key, &parts),
            HashAlgo::Blake3 => {
                let mut hasher = blake3::Hasher::new_keyed(blake3::hash(key).as_bytes());
                parts.iter().for_each(|part| {
                    hasher.update(part);
                });
                Ok(hex::encode(hasher.finalize().as_bytes()))
            }
        }
    }

    /// Constant-time comparison of a freshly computed signature with the one
    /// carried in an envelope.
    #[must_use]
    pub fn matches(expected: &str, carried: &[u8]) -> bool {
        bool::from(expected.as_bytes().ct_eq(carried))
    }
}

fn digest_hex<D: Digest>(parts: &[&[u8]]) -> String {
    let mut hasher = D::new();
    parts.iter().for_each(|part| hasher.update(part));
    hex::encode(hasher.finalize())
}

fn mac_hex<M: Mac + KeyInit>(key: &[u8], parts: &[&[u8]]) -> Result<String> {
    let mut mac = <M as KeyInit>::new_from_slice(key).map_err(|_| Error::Primitive)?;
    parts.iter().for_each(|part| mac.update(part));
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(algo: HashAlgo) -> Signer {
        Signer::new(algo, SecretBytes::new(b"pepper"))
    }

    #[test]
    fn test_digest_is_salted_hash_in_lowercase_hex() {
        let expected = hex::encode(Sha256::digest(b"pepperhello"));
        assert_eq!(signer(HashAlgo::Sha256).digest(b"hello"), expected);
        assert!(expected.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_digest_lengths_follow_algorithm() {
        assert_eq!(signer(HashAlgo::Sha224).digest(b"x").len(), 56);
        assert_eq!(signer(HashAlgo::Sha256).digest(b"x").len(), 64);
        assert_eq!(signer(HashAlgo::Sha384).digest(b"x").len(), 96);
        assert_eq!(signer(HashAlgo::Sha512).digest(b"x").len(), 128);
        assert_eq!(signer(HashAlgo::Blake3).digest(b"x").len(), 64);
    }

    #[test]
    fn test_blake3_digest_matches_reference() {
        let expected = blake3::hash(b"pepperhello").to_hex().to_string();
        assert_eq!(signer(HashAlgo::Blake3).digest(b"hello"), expected);
    }

    #[test]
    fn test_mac_is_hmac_over_iv_and_ciphertext() {
        let mut reference = <Hmac<Sha256> as KeyInit>::new_from_slice(b"pepper").unwrap();
        reference.update(b"iv-bytes");
        reference.update(b"ciphertext");
        let expected = hex::encode(reference.finalize().into_bytes());

        assert_eq!(signer(HashAlgo::Sha256).mac(b"iv-bytes", b"ciphertext").unwrap(), expected);
    }

    #[test]
    fn test_mac_depends_on_salt() {
        let other = Signer::new(HashAlgo::Sha256, SecretBytes::new(b"salt"));
        assert_ne!(signer(HashAlgo::Sha256).mac(b"iv", b"ct").unwrap(), other.mac(b"iv", b"ct").unwrap());

        let other = Signer::new(HashAlgo::Blake3, SecretBytes::new(b"salt"));
        assert_ne!(signer(HashAlgo::Blake3).mac(b"iv", b"ct").unwrap(), other.mac(b"iv", b"ct").unwrap());
    }

    #[test]
    fn test_matches() {
        let signature = signer(HashAlgo::Sha256).digest(b"hello");
        assert!(Signer::matches(&signature, signature.as_bytes()));

        let mut corrupted = signature.clone().into_bytes();
        corrupted[0] ^= 0x01;
        assert!(!Signer::matches(&signature, &corrupted));
        assert!(!Signer::matches(&signature, &signature.as_bytes()[1..]));
        assert!(!Signer::matches(&signature, b""));
    }
}
