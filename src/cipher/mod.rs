//! # Cipher Engine
//!
//! Block-cipher encryption and decryption for one `(cipher, mode)` pair.
//!
//! The engine zero-pads plaintext to the cipher block size before encrypting
//! and hands back the still-padded plaintext on decryption; stripping the
//! padding belongs to the caller (see [`crate::padding`]).
//!
//! ## Keys
//!
//! The key stored in a [`CipherConfig`](crate::config::CipherConfig) is never
//! longer than [`CipherKind::key_size`]. A shorter key is zero-extended to
//! the cipher key size when the primitive is instantiated, so a 5-byte key
//! behaves exactly like the same 5 bytes followed by zeros. Short keys are
//! therefore weak; callers should supply full-length keys.

mod mode;
pub mod random;

pub use random::generate_iv;

use crate::error::{Error, Result};
use crate::padding::ZeroPadding;
use crate::secret::SecretBytes;
use crate::types::{BlockMode, CipherKind};

pub struct Engine {
    cipher: CipherKind,
    mode: BlockMode,
    key: SecretBytes,
    padding: ZeroPadding,
}

impl Engine {
    /// Builds an engine, fitting `key` to exactly [`CipherKind::key_size`]
    /// bytes (truncated when longer, zero-extended when shorter).
    ///
    /// [`CipherKind::Rijndael128`] is first narrowed to the AES variant that
    /// matches the key length.
    #[must_use]
    pub fn new(cipher: CipherKind, mode: BlockMode, key: &[u8]) -> Self {
        let cipher = cipher.for_key_len(key.len());
        let mut fitted = vec![0u8; cipher.key_size()];
        let len = key.len().min(fitted.len());
        fitted[..len].copy_from_slice(&key[..len]);

        Self { cipher, mode, key: SecretBytes::from_vec(fitted), padding: ZeroPadding::new(cipher.block_size()) }
    }

    /// Encrypts `plaintext` under `iv`. The result is always block-aligned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Primitive`] if `iv` has the wrong length.
    pub fn encrypt(&self, plaintext: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        let mut buf = self.padding.pad(plaintext);
        let key = self.key.expose_secret();

        match self.cipher {
            CipherKind::Aes128 => mode::encrypt::<aes::Aes128>(self.mode, key, iv, &mut buf),
            CipherKind::Aes192 => mode::encrypt::<aes::Aes192>(self.mode, key, iv, &mut buf),
            CipherKind::Aes256 | CipherKind::Rijndael128 => mode::encrypt::<aes::Aes256>(self.mode, key, iv, &mut buf),
        }
        .map_err(|_| Error::Primitive)?;

        Ok(buf)
    }

    /// Decrypts `ciphertext` under `iv`, returning the plaintext with any
    /// zero padding still attached.
    ///
    /// Keystream modes accept ciphertext of any length, which covers
    /// envelopes written without padding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rejected`] if CBC ciphertext is not block-aligned and
    /// [`Error::Primitive`] if `iv` has the wrong length.
    pub fn decrypt(&self, ciphertext: &[u8], iv: &[u8]) -> Result<Vec<u8>> {
        if !self.mode.is_keystream() && !self.padding.is_aligned(ciphertext.len()) {
            return Err(Error::Rejected);
        }

        let mut buf = ciphertext.to_vec();
        let key = self.key.expose_secret();

        match self.cipher {
            CipherKind::Aes128 => mode::decrypt::<aes::Aes128>(self.mode, key, iv, &mut buf),
            CipherKind::Aes192 => mode::decrypt::<aes::Aes192>(self.mode, key, iv, &mut buf),
            CipherKind::Aes256 | CipherKind::Rijndael128 => mode::decrypt::<aes::Aes256>(self.mode, key, iv, &mut buf),
        }
        .map_err(|_| Error::Primitive)?;

        Ok(buf)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("cipher", &self.cipher).field("mode", &self.mode).field("key", &self.key).finish_non_exhaustive()
    }
}
