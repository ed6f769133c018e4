//! # Authenticated Codec
//!
//! Turns plaintext into a self-contained, tamper-evident ASCII envelope and
//! back:
//!
//! ```text
//! base64(hex signature) <delimiter> base64(iv || ciphertext)
//! ```
//!
//! Every [`Codec::encode`] draws a fresh IV, so encoding the same plaintext
//! twice yields two different envelopes that both decode to it.
//!
//! [`Codec::decode`] treats its input as untrusted. Anything that is not
//! exactly two delimiter-separated strict-base64 parts, carries a blob
//! shorter than the IV, holds CBC ciphertext that is not block-aligned, or
//! fails the signature check
//! comes back as [`Error::Rejected`]. Callers cannot tell these cases apart;
//! the reason is only logged at `debug` level.
//!
//! Trailing NUL bytes of the plaintext do not survive the trip (see
//! [`crate::padding`]).

use strum::IntoStaticStr;
use tracing::debug;

use crate::cipher::{Engine, generate_iv};
use crate::config::{CipherConfig, Settings};
use crate::error::{Error, Result};
use crate::padding::ZeroPadding;
use crate::signature::Signer;
use crate::types::SignatureScheme;

/// Why an envelope was rejected. Internal only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
enum Rejection {
    PartCount,
    SignatureEncoding,
    PayloadEncoding,
    TruncatedIv,
    Misaligned,
    SignatureMismatch,
}

pub struct Codec {
    config: CipherConfig,
    engine: Engine,
    signer: Signer,
}

impl Codec {
    #[must_use]
    pub fn new(config: CipherConfig) -> Self {
        let engine = Engine::new(config.cipher(), config.mode(), config.key());
        let signer = Signer::new(config.hash_algo(), config.sign_salt().clone());
        Self { config, engine, signer }
    }

    /// Resolves `settings` as configuration group `group` and builds a codec.
    ///
    /// # Errors
    ///
    /// Propagates the configuration errors of [`Settings::resolve`].
    pub fn from_settings(group: &str, settings: &Settings) -> Result<Self> {
        settings.resolve(group).map(Self::new)
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// Encrypts and signs `plaintext`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Entropy`] if no IV could be drawn.
    pub fn encode(&self, plaintext: &[u8]) -> Result<String> {
        let iv = generate_iv(self.config.iv_size())?;
        self.encode_with_iv(plaintext, iv)
    }

    fn encode_with_iv(&self, plaintext: &[u8], iv: Vec<u8>) -> Result<String> {
        let ciphertext = self.engine.encrypt(plaintext, &iv)?;

        let signature = match self.config.scheme() {
            // Sign what decode will recover, so payloads ending in NUL still verify.
            SignatureScheme::Plaintext => self.signer.digest(ZeroPadding::unpad(plaintext)),
            SignatureScheme::Ciphertext => self.signer.mac(&iv, &ciphertext)?,
        };

        let mut blob = iv;
        blob.extend_from_slice(&ciphertext);

        let alphabet = self.config.alphabet();
        let envelope = format!("{}{}{}", alphabet.encode(signature.as_bytes()), self.config.delimiter(), alphabet.encode(&blob));

        debug!(plaintext_len = plaintext.len(), envelope_len = envelope.len(), scheme = %self.config.scheme(), "encoded envelope");

        Ok(envelope)
    }

    /// Verifies and decrypts an envelope produced by [`Codec::encode`] under
    /// the same configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rejected`] for any malformed, truncated or tampered
    /// envelope. No partial plaintext is ever returned.
    pub fn decode(&self, envelope: &str) -> Result<Vec<u8>> {
        self.open(envelope).map_err(|rejection| {
            let reason: &'static str = rejection.into();
            debug!(reason, envelope_len = envelope.len(), "envelope rejected");
            Error::Rejected
        })
    }

    fn open(&self, envelope: &str) -> Result<Vec<u8>, Rejection> {
        let alphabet = self.config.alphabet();

        let parts: Vec<&str> = envelope.split(self.config.delimiter()).collect();
        let [signature, payload] = parts.as_slice() else {
            return Err(Rejection::PartCount);
        };

        let signature = alphabet.decode(signature).map_err(|_| Rejection::SignatureEncoding)?;
        let blob = alphabet.decode(payload).map_err(|_| Rejection::PayloadEncoding)?;

        let iv_size = self.config.iv_size();
        if blob.len() < iv_size {
            return Err(Rejection::TruncatedIv);
        }
        let (iv, ciphertext) = blob.split_at(iv_size);

        let plaintext = match self.config.scheme() {
            SignatureScheme::Ciphertext => {
                let expected = self.signer.mac(iv, ciphertext).map_err(|_| Rejection::SignatureMismatch)?;
                if !Signer::matches(&expected, &signature) {
                    return Err(Rejection::SignatureMismatch);
                }
                self.decrypt(iv, ciphertext)?
            }
            SignatureScheme::Plaintext => {
                let plaintext = self.decrypt(iv, ciphertext)?;
                if !Signer::matches(&self.signer.digest(&plaintext), &signature) {
                    return Err(Rejection::SignatureMismatch);
                }
                plaintext
            }
        };

        debug!(plaintext_len = plaintext.len(), "decoded envelope");

        Ok(plaintext)
    }

    fn decrypt(&self, iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, Rejection> {
        let padded = self.engine.decrypt(ciphertext, iv).map_err(|_| Rejection::Misaligned)?;
        Ok(ZeroPadding::unpad(&padded).to_vec())
    }
}

impl std::fmt::Debug for Codec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Codec").field("config", &self.config).finish_non_exhaustive()
    }
}
