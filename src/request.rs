// src/request.rs
//! Request and result types for one unit of cipher work
//!
//! `CipherSpec` is the closed union of every supported (algorithm, mode)
//! pair. Adding a combination means adding a variant and following the
//! compiler through every exhaustive match.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aliases::SecretBytes;
use crate::codec::EncodeOptions;
use crate::config;
use crate::consts::*;
use crate::enums::{
    AesKeySize, AesMode, Algorithm, ChainMode, Direction, Encoding, HashAlgorithm, KeyRole,
    PaddingScheme,
};

/// Algorithm plus the mode it runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum CipherSpec {
    Aes { mode: AesMode, key_size: AesKeySize },
    Des { mode: ChainMode },
    #[serde(rename = "tripledes")]
    TripleDes { mode: ChainMode },
    Blowfish { mode: ChainMode },
    Twofish { mode: ChainMode },
    #[serde(rename = "chacha20")]
    ChaCha20 { aead: bool },
    Salsa20,
}

/// Allowed key lengths for a cipher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyLengthRule {
    Exact(usize),
    OneOf(&'static [usize]),
    Range(usize, usize),
}

impl KeyLengthRule {
    pub fn allows(&self, len: usize) -> bool {
        match *self {
            KeyLengthRule::Exact(n) => len == n,
            KeyLengthRule::OneOf(lens) => lens.contains(&len),
            KeyLengthRule::Range(lo, hi) => (lo..=hi).contains(&len),
        }
    }
}

impl fmt::Display for KeyLengthRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyLengthRule::Exact(n) => write!(f, "exactly {n} bytes"),
            KeyLengthRule::OneOf(lens) => {
                let lens: Vec<String> = lens.iter().map(|n| n.to_string()).collect();
                write!(f, "one of {} bytes", lens.join("/"))
            }
            KeyLengthRule::Range(lo, hi) => write!(f, "{lo}–{hi} bytes"),
        }
    }
}

impl CipherSpec {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            CipherSpec::Aes { .. } => Algorithm::Aes,
            CipherSpec::Des { .. } => Algorithm::Des,
            CipherSpec::TripleDes { .. } => Algorithm::TripleDes,
            CipherSpec::Blowfish { .. } => Algorithm::Blowfish,
            CipherSpec::Twofish { .. } => Algorithm::Twofish,
            CipherSpec::ChaCha20 { .. } => Algorithm::ChaCha20,
            CipherSpec::Salsa20 => Algorithm::Salsa20,
        }
    }

    /// Block size for padded modes, `None` for GCM and stream ciphers
    pub fn block_size(&self) -> Option<usize> {
        match self {
            CipherSpec::Aes {
                mode: AesMode::Gcm, ..
            } => None,
            CipherSpec::Aes { .. } | CipherSpec::Twofish { .. } => Some(BLOCK_SIZE_128),
            CipherSpec::Des { .. } | CipherSpec::TripleDes { .. } | CipherSpec::Blowfish { .. } => {
                Some(BLOCK_SIZE_64)
            }
            CipherSpec::ChaCha20 { .. } | CipherSpec::Salsa20 => None,
        }
    }

    pub fn uses_padding(&self) -> bool {
        self.block_size().is_some()
    }

    pub fn is_aead(&self) -> bool {
        matches!(
            self,
            CipherSpec::Aes {
                mode: AesMode::Gcm,
                ..
            } | CipherSpec::ChaCha20 { aead: true }
        )
    }

    /// Takes an explicit starting block counter
    pub fn uses_counter(&self) -> bool {
        matches!(self, CipherSpec::ChaCha20 { aead: false } | CipherSpec::Salsa20)
    }

    /// IV/nonce length to generate; `None` when the mode takes no IV
    pub fn iv_len(&self) -> Option<usize> {
        match self {
            CipherSpec::Aes {
                mode: AesMode::Ecb, ..
            } => None,
            CipherSpec::Aes {
                mode: AesMode::Gcm, ..
            } => Some(config::load().block.gcm_iv_len),
            CipherSpec::Aes { .. } | CipherSpec::Twofish { mode: ChainMode::Cbc } => {
                Some(BLOCK_SIZE_128)
            }
            CipherSpec::Des { mode }
            | CipherSpec::TripleDes { mode }
            | CipherSpec::Blowfish { mode } => match mode {
                ChainMode::Cbc => Some(BLOCK_SIZE_64),
                ChainMode::Ecb => None,
            },
            CipherSpec::Twofish {
                mode: ChainMode::Ecb,
            } => None,
            CipherSpec::ChaCha20 { .. } => Some(CHACHA20_NONCE_LEN),
            CipherSpec::Salsa20 => Some(SALSA20_NONCE_LEN),
        }
    }

    pub fn key_length_rule(&self) -> KeyLengthRule {
        match self {
            CipherSpec::Aes { key_size, .. } => KeyLengthRule::Exact(key_size.bytes()),
            CipherSpec::Des { .. } => KeyLengthRule::Exact(DES_KEY_LEN),
            CipherSpec::TripleDes { .. } => KeyLengthRule::Exact(TRIPLE_DES_KEY_LEN),
            CipherSpec::Blowfish { .. } => KeyLengthRule::Range(BLOWFISH_KEY_MIN, BLOWFISH_KEY_MAX),
            CipherSpec::Twofish { .. } => KeyLengthRule::OneOf(&TWOFISH_KEY_LENS),
            CipherSpec::ChaCha20 { .. } | CipherSpec::Salsa20 => {
                KeyLengthRule::Exact(STREAM_KEY_LEN)
            }
        }
    }

    /// Exact key length a KDF must produce for this cipher
    pub fn derived_key_len(&self) -> usize {
        match self {
            CipherSpec::Aes { key_size, .. } => key_size.bytes(),
            CipherSpec::Des { .. } => DES_KEY_LEN,
            CipherSpec::TripleDes { .. } => TRIPLE_DES_KEY_LEN,
            CipherSpec::Blowfish { .. } => BLOWFISH_DERIVED_KEY_LEN,
            CipherSpec::Twofish { .. } => TWOFISH_DERIVED_KEY_LEN,
            CipherSpec::ChaCha20 { .. } | CipherSpec::Salsa20 => STREAM_KEY_LEN,
        }
    }
}

impl fmt::Display for CipherSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherSpec::Aes { mode, key_size } => {
                write!(f, "AES-{}-{:?}", key_size.bytes() * 8, mode)
            }
            CipherSpec::Des { mode }
            | CipherSpec::TripleDes { mode }
            | CipherSpec::Blowfish { mode }
            | CipherSpec::Twofish { mode } => write!(f, "{}-{:?}", self.algorithm(), mode),
            CipherSpec::ChaCha20 { aead: true } => f.write_str("ChaCha20-Poly1305"),
            CipherSpec::ChaCha20 { aead: false } => f.write_str("ChaCha20"),
            CipherSpec::Salsa20 => f.write_str("Salsa20"),
        }
    }
}

/// Key bytes plus how to treat them. Zeroized on drop.
pub struct KeyMaterial {
    bytes: SecretBytes,
    role: KeyRole,
}

impl KeyMaterial {
    /// Bytes used as the cipher key directly
    pub fn raw(bytes: Vec<u8>) -> Self {
        KeyMaterial {
            bytes: SecretBytes::new(bytes),
            role: KeyRole::Raw,
        }
    }

    /// Low-entropy input stretched by a KDF
    pub fn passphrase(bytes: Vec<u8>) -> Self {
        KeyMaterial {
            bytes: SecretBytes::new(bytes),
            role: KeyRole::KdfInput,
        }
    }

    pub fn role(&self) -> KeyRole {
        self.role
    }

    pub fn len(&self) -> usize {
        self.bytes.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn expose_secret(&self) -> &[u8] {
        self.bytes.expose_secret()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("role", &self.role)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

/// Key derivation choice
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kdf", rename_all = "lowercase")]
pub enum KdfSpec {
    #[default]
    None,
    Pbkdf2 {
        iterations: u32,
        hash: HashAlgorithm,
    },
    Hkdf {
        hash: HashAlgorithm,
        #[serde(default, with = "hex_bytes")]
        info: Vec<u8>,
    },
}

impl KdfSpec {
    /// PBKDF2 with the configured iteration count and hash
    pub fn pbkdf2_default() -> Self {
        let kdf = &config::load().kdf;
        KdfSpec::Pbkdf2 {
            iterations: kdf.pbkdf2_iterations,
            hash: kdf.hash,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, KdfSpec::None)
    }
}

/// One immutable unit of work
#[derive(Debug)]
pub struct CipherRequest {
    pub direction: Direction,
    pub cipher: CipherSpec,
    /// Filled from config by the constructors for padded modes; `None`
    /// on a padded mode means `Pkcs7`
    pub padding: Option<PaddingScheme>,
    pub key: KeyMaterial,
    pub kdf: KdfSpec,
    /// KDF salt, independent of the IV/nonce
    pub salt: Vec<u8>,
    pub iv: Option<Vec<u8>>,
    pub counter: Option<u64>,
    pub input: Vec<u8>,
    pub input_encoding: Encoding,
    pub output_encoding: Encoding,
    pub output_options: EncodeOptions,
}

impl CipherRequest {
    /// Start a request with no KDF, no IV, the configured padding and raw
    /// bytes in and out
    pub fn new(direction: Direction, cipher: CipherSpec, key: KeyMaterial) -> Self {
        CipherRequest {
            direction,
            cipher,
            padding: cipher
                .uses_padding()
                .then(|| config::load().block.default_padding),
            key,
            kdf: KdfSpec::None,
            salt: Vec::new(),
            iv: None,
            counter: None,
            input: Vec::new(),
            input_encoding: Encoding::Binary,
            output_encoding: Encoding::Binary,
            output_options: EncodeOptions::default(),
        }
    }

    pub fn encrypt(cipher: CipherSpec, key: KeyMaterial) -> Self {
        Self::new(Direction::Encrypt, cipher, key)
    }

    pub fn decrypt(cipher: CipherSpec, key: KeyMaterial) -> Self {
        Self::new(Direction::Decrypt, cipher, key)
    }

    pub fn with_padding(mut self, padding: PaddingScheme) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn with_kdf(mut self, kdf: KdfSpec, salt: Vec<u8>) -> Self {
        self.kdf = kdf;
        self.salt = salt;
        self
    }

    pub fn with_iv(mut self, iv: Vec<u8>) -> Self {
        self.iv = Some(iv);
        self
    }

    pub fn with_counter(mut self, counter: u64) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Raw input bytes (`Encoding::Binary`)
    pub fn with_input(mut self, input: Vec<u8>) -> Self {
        self.input = input;
        self.input_encoding = Encoding::Binary;
        self
    }

    /// Textual input in the given encoding
    pub fn with_text_input(mut self, text: &str, encoding: Encoding) -> Self {
        self.input = text.as_bytes().to_vec();
        self.input_encoding = encoding;
        self
    }

    pub fn with_output(mut self, encoding: Encoding) -> Self {
        self.output_encoding = encoding;
        self
    }

    pub fn with_output_options(mut self, options: EncodeOptions) -> Self {
        self.output_options = options;
        self
    }

    /// Padding that will actually be applied, if the mode pads at all
    pub fn effective_padding(&self) -> Option<PaddingScheme> {
        self.cipher
            .uses_padding()
            .then(|| self.padding.unwrap_or_default())
    }
}

/// Output of a successful request. The caller owns it and is responsible
/// for clearing sensitive bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CipherResult {
    #[serde(with = "hex_bytes")]
    pub bytes: Vec<u8>,
    /// Textual rendering, absent for `Encoding::Binary`
    pub text: Option<String>,
    /// Output was requested as UTF-8 but is not clean text
    pub is_lossy_text: bool,
}

/// Serialize byte fields as lowercase hex strings
pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(text).map_err(serde::de::Error::custom)
    }
}
