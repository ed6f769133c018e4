//! sigcrypt - block-cipher string encryption with tamper detection.
//!
//! Encrypts arbitrary bytes into a printable envelope and binds a keyed
//! signature to it, so that corrupted or forged envelopes are refused on
//! decode:
//! - AES-128/192/256 in CBC, CFB, OFB or CTR mode with a fresh random IV
//! - SHA-2 or BLAKE3 signatures, salted digest or encrypt-then-MAC
//! - Base64 wire format `signature<delimiter>iv||ciphertext`
//!
//! ```no_run
//! use sigcrypt::{Codec, Settings};
//!
//! let settings = Settings::new().key("0123456789abcdef0123456789abcdef").sign_salt("pepper");
//! let codec = Codec::from_settings("default", &settings)?;
//!
//! let envelope = codec.encode(b"hello")?;
//! assert_eq!(codec.decode(&envelope)?, b"hello");
//! # Ok::<(), sigcrypt::Error>(())
//! ```

pub mod cipher;
pub mod codec;
pub mod config;
pub mod error;
pub mod padding;
pub mod registry;
pub mod secret;
pub mod signature;
pub mod types;

pub use codec::Codec;
pub use config::{CipherConfig, Settings};
pub use error::{Error, Result};
pub use registry::Registry;
