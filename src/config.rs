//! Configuration: defaults, caller-supplied settings and the resolved,
//! immutable [`CipherConfig`].
//!
//! Loading settings (files, vaults, environment) happens outside this crate.
//! The caller fills a [`Settings`] value and [`Settings::resolve`] applies the
//! defaults below, validates what must be present and produces the
//! configuration a [`Codec`](crate::codec::Codec) is built from.
//!
//! ## Defaults
//!
//! | setting     | default        |
//! |-------------|----------------|
//! | `cipher`    | `aes-256`      |
//! | `mode`      | `ofb`          |
//! | `hash_algo` | `sha256`       |
//! | `delimiter` | `.`            |
//! | `scheme`    | `ciphertext`   |
//! | `alphabet`  | `standard`     |
//!
//! `key` and `sign_salt` have no defaults: a missing value is a configuration
//! error and no codec is created.

use tracing::debug;

use crate::error::{Error, Result};
use crate::secret::SecretBytes;
use crate::types::{Alphabet, BlockMode, CipherKind, HashAlgo, SignatureScheme};

/// Application name used in CLI output.
pub const APP_NAME: &str = "sigcrypt";

/// Name of the configuration group used when none is given.
pub const DEFAULT_GROUP: &str = "default";

/// Separator between the signature part and the ciphertext part.
///
/// Must not be a base64 character; `.` is outside both supported alphabets.
pub const DEFAULT_DELIMITER: &str = ".";

/// Environment variable the CLI reads the encryption key from.
pub const KEY_ENV: &str = "SIGCRYPT_KEY";

/// Environment variable the CLI reads the signature salt from.
pub const SIGN_SALT_ENV: &str = "SIGCRYPT_SIGN_SALT";

/// Caller-supplied settings for one configuration group.
///
/// Every field is optional; [`Settings::resolve`] fills in defaults.
#[derive(Clone, Default)]
pub struct Settings {
    key: Option<Vec<u8>>,
    cipher: Option<CipherKind>,
    mode: Option<BlockMode>,
    hash_algo: Option<HashAlgo>,
    sign_salt: Option<Vec<u8>>,
    delimiter: Option<String>,
    scheme: Option<SignatureScheme>,
    alphabet: Option<Alphabet>,
}

impl Settings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn cipher(mut self, cipher: CipherKind) -> Self {
        self.cipher = Some(cipher);
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: BlockMode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[must_use]
    pub fn hash_algo(mut self, hash_algo: HashAlgo) -> Self {
        self.hash_algo = Some(hash_algo);
        self
    }

    #[must_use]
    pub fn sign_salt(mut self, sign_salt: impl Into<Vec<u8>>) -> Self {
        self.sign_salt = Some(sign_salt.into());
        self
    }

    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = Some(delimiter.into());
        self
    }

    #[must_use]
    pub fn scheme(mut self, scheme: SignatureScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    #[must_use]
    pub fn alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = Some(alphabet);
        self
    }

    /// Applies defaults and validates the settings of `group`.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingKey`] when no (or an empty) key is set
    /// - [`Error::MissingSignSalt`] when no (or an empty) salt is set
    /// - [`Error::InvalidDelimiter`] when the delimiter is empty or contains a
    ///   character of the configured base64 alphabet
    pub fn resolve(&self, group: &str) -> Result<CipherConfig> {
        let key = self.key.as_deref().filter(|key| !key.is_empty()).ok_or_else(|| Error::MissingKey { group: group.to_owned() })?;
        let sign_salt = self.sign_salt.as_deref().filter(|salt| !salt.is_empty()).ok_or_else(|| Error::MissingSignSalt { group: group.to_owned() })?;

        let cipher = self.cipher.unwrap_or_default();
        let mode = self.mode.unwrap_or_default();
        let alphabet = self.alphabet.unwrap_or_default();
        let delimiter = self.delimiter.clone().unwrap_or_else(|| DEFAULT_DELIMITER.to_owned());

        if delimiter.is_empty() {
            return Err(Error::InvalidDelimiter { group: group.to_owned(), delimiter, reason: "delimiter is empty" });
        }
        if delimiter.chars().any(|c| alphabet.contains(c)) {
            return Err(Error::InvalidDelimiter { group: group.to_owned(), delimiter, reason: "delimiter overlaps the base64 alphabet" });
        }

        // Longer keys are cut to what the cipher can use; shorter ones are kept as given.
        let key = &key[..key.len().min(cipher.key_size())];
        let cipher = cipher.for_key_len(key.len());

        let config = CipherConfig {
            key: SecretBytes::new(key),
            cipher,
            mode,
            iv_size: mode.iv_size(cipher),
            hash_algo: self.hash_algo.unwrap_or_default(),
            sign_salt: SecretBytes::new(sign_salt),
            delimiter,
            scheme: self.scheme.unwrap_or_default(),
            alphabet,
        };

        debug!(group, cipher = %config.cipher, mode = %config.mode, hash = %config.hash_algo, scheme = %config.scheme, "configuration resolved");

        Ok(config)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("cipher", &self.cipher)
            .field("mode", &self.mode)
            .field("hash_algo", &self.hash_algo)
            .field("sign_salt", &self.sign_salt.as_ref().map(|_| "[REDACTED]"))
            .field("delimiter", &self.delimiter)
            .field("scheme", &self.scheme)
            .field("alphabet", &self.alphabet)
            .finish()
    }
}

/// Resolved configuration owned by exactly one codec. Never mutated.
#[derive(Clone, Debug)]
pub struct CipherConfig {
    key: SecretBytes,
    cipher: CipherKind,
    mode: BlockMode,
    iv_size: usize,
    hash_algo: HashAlgo,
    sign_salt: SecretBytes,
    delimiter: String,
    scheme: SignatureScheme,
    alphabet: Alphabet,
}

impl CipherConfig {
    /// Key bytes after truncation to the cipher's maximum key size.
    #[must_use]
    pub fn key(&self) -> &[u8] {
        self.key.expose_secret()
    }

    #[must_use]
    pub fn cipher(&self) -> CipherKind {
        self.cipher
    }

    #[must_use]
    pub fn mode(&self) -> BlockMode {
        self.mode
    }

    #[must_use]
    pub fn iv_size(&self) -> usize {
        self.iv_size
    }

    #[must_use]
    pub fn hash_algo(&self) -> HashAlgo {
        self.hash_algo
    }

    #[must_use]
    pub fn sign_salt(&self) -> &SecretBytes {
        &self.sign_salt
    }

    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    #[must_use]
    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    #[must_use]
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }
}
