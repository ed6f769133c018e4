use std::io::{Read, Write};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use tracing::Level;

use sigcrypt::cipher;
use sigcrypt::codec::Codec;
use sigcrypt::config::{APP_NAME, DEFAULT_GROUP, KEY_ENV, SIGN_SALT_ENV, Settings};
use sigcrypt::types::{Alphabet, BlockMode, CipherKind, HashAlgo, SignatureScheme};

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt and sign TEXT (or stdin), printing the envelope.
    Encode { text: Option<String> },

    /// Verify and decrypt ENVELOPE (or stdin), writing the plaintext to stdout.
    Decode { envelope: Option<String> },

    /// Show the resolved configuration without any secrets.
    Info,
}

#[derive(Args)]
pub struct CodecArgs {
    /// Encryption key. Truncated to the cipher key size.
    #[arg(long, global = true, env = KEY_ENV, hide_env_values = true)]
    key: Option<String>,

    /// Secret salt mixed into every signature.
    #[arg(long, global = true, env = SIGN_SALT_ENV, hide_env_values = true)]
    sign_salt: Option<String>,

    /// aes-128, aes-192, aes-256 or rijndael-128 (AES sized by the key).
    #[arg(long, global = true)]
    cipher: Option<CipherKind>,

    /// cbc, cfb, ofb or ctr.
    #[arg(long, global = true)]
    mode: Option<BlockMode>,

    /// sha224, sha256, sha384, sha512 or blake3.
    #[arg(long, global = true)]
    hash: Option<HashAlgo>,

    /// Separator between signature and ciphertext.
    #[arg(long, global = true)]
    delimiter: Option<String>,

    /// What the signature covers: plaintext or ciphertext.
    #[arg(long, global = true)]
    scheme: Option<SignatureScheme>,

    /// Use the URL-safe base64 alphabet.
    #[arg(long, global = true)]
    url_safe: bool,
}

impl CodecArgs {
    fn settings(&self) -> Settings {
        let mut settings = Settings::new();

        if let Some(key) = &self.key {
            settings = settings.key(key.as_bytes());
        }
        if let Some(sign_salt) = &self.sign_salt {
            settings = settings.sign_salt(sign_salt.as_bytes());
        }
        if let Some(cipher) = self.cipher {
            settings = settings.cipher(cipher);
        }
        if let Some(mode) = self.mode {
            settings = settings.mode(mode);
        }
        if let Some(hash) = self.hash {
            settings = settings.hash_algo(hash);
        }
        if let Some(delimiter) = &self.delimiter {
            settings = settings.delimiter(delimiter.as_str());
        }
        if let Some(scheme) = self.scheme {
            settings = settings.scheme(scheme);
        }
        if self.url_safe {
            settings = settings.alphabet(Alphabet::UrlSafe);
        }

        settings
    }
}

#[derive(Parser)]
#[command(name = APP_NAME, version, about = "Encrypt strings into tamper-evident envelopes and verify them back.")]
pub struct App {
    #[command(flatten)]
    codec: CodecArgs,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl App {
    pub fn init() -> Result<Self> {
        let app = Self::parse();
        let level = if app.verbose { Level::DEBUG } else { Level::WARN };
        let subscriber = tracing_subscriber::fmt().with_max_level(level).with_writer(std::io::stderr).with_file(true).with_line_number(true).finish();
        tracing::subscriber::set_global_default(subscriber)?;
        Ok(app)
    }

    pub fn execute(self) -> Result<()> {
        let codec = Codec::from_settings(DEFAULT_GROUP, &self.codec.settings()).context("invalid configuration")?;

        match self.command {
            Commands::Encode { text } => Self::encode(&codec, text),
            Commands::Decode { envelope } => Self::decode(&codec, envelope),
            Commands::Info => {
                Self::show_info(&codec);
                Ok(())
            }
        }
    }

    fn encode(codec: &Codec, text: Option<String>) -> Result<()> {
        let plaintext = match text {
            Some(text) => text.into_bytes(),
            None => {
                let mut buf = Vec::new();
                std::io::stdin().read_to_end(&mut buf).context("failed to read stdin")?;
                buf
            }
        };

        let envelope = codec.encode(&plaintext).context("encode failed")?;
        println!("{envelope}");

        Ok(())
    }

    fn decode(codec: &Codec, envelope: Option<String>) -> Result<()> {
        let envelope = match envelope {
            Some(envelope) => envelope,
            None => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
                buf
            }
        };

        let plaintext = codec.decode(envelope.trim()).context("decode failed")?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&plaintext).context("failed to write plaintext")?;
        stdout.flush()?;

        Ok(())
    }

    fn show_info(codec: &Codec) {
        let config = codec.config();
        let rows = [
            ("cipher", config.cipher().to_string()),
            ("mode", config.mode().to_string()),
            ("iv size", format!("{} bytes", config.iv_size())),
            ("key", format!("{} bytes", config.key().len())),
            ("hash", config.hash_algo().to_string()),
            ("scheme", config.scheme().to_string()),
            ("alphabet", config.alphabet().to_string()),
            ("delimiter", format!("{:?}", config.delimiter())),
            ("entropy", cipher::random::source().to_owned()),
        ];

        for (label, value) in rows {
            println!("  {:>10}  {}", style(label).bold(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> App {
        App::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_encode() {
        let app = parse(&["sigcrypt", "--key", "k", "--sign-salt", "s", "--mode", "cbc", "encode", "hello"]);
        assert!(matches!(app.command, Commands::Encode { text: Some(ref text) } if text == "hello"));
        assert_eq!(app.codec.mode, Some(BlockMode::Cbc));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let app = parse(&["sigcrypt", "decode", "--cipher", "aes-128", "--hash", "blake3", "--url-safe", "-v"]);
        assert!(matches!(app.command, Commands::Decode { envelope: None }));
        assert_eq!(app.codec.cipher, Some(CipherKind::Aes128));
        assert_eq!(app.codec.hash, Some(HashAlgo::Blake3));
        assert!(app.codec.url_safe);
        assert!(app.verbose);
    }

    #[test]
    fn test_unknown_identifier_rejected() {
        assert!(App::try_parse_from(["sigcrypt", "--mode", "ecb", "info"]).is_err());
    }

    #[test]
    fn test_settings_roundtrip_through_codec() {
        let app = parse(&["sigcrypt", "--key", "0123456789abcdef", "--sign-salt", "pepper", "--delimiter", "|", "--scheme", "plaintext", "info"]);
        let codec = Codec::from_settings(DEFAULT_GROUP, &app.codec.settings()).unwrap();
        assert_eq!(codec.config().delimiter(), "|");
        assert_eq!(codec.config().scheme(), SignatureScheme::Plaintext);
        assert_eq!(codec.decode(&codec.encode(b"hello").unwrap()).unwrap(), b"hello");
    }

    #[test]
    fn test_missing_salt_is_configuration_error() {
        let app = parse(&["sigcrypt", "--key", "k", "--sign-salt", "", "info"]);
        assert!(Codec::from_settings(DEFAULT_GROUP, &app.codec.settings()).is_err());
    }
}
