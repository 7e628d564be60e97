// src/lib.rs
//! cipher-engine: one request in, one result out, across a fixed catalogue
//! of symmetric ciphers
//!
//! Features:
//! - AES (GCM/CBC/CFB/CTR/OFB/ECB), DES, 3DES, Blowfish, Twofish
//! - ChaCha20, Salsa20 and ChaCha20-Poly1305 with explicit block counters
//! - PBKDF2 / HKDF key derivation
//! - Six padding schemes, four textual encodings
//! - Key material held in secure-gate wrappers and zeroized on drop

pub mod aliases;
pub mod block;
pub mod codec;
pub mod config;
pub mod consts;
pub mod engine;
pub mod enums;
pub mod error;
pub mod kdf;
pub mod padding;
pub mod random;
pub mod request;
pub mod stream;

// Re-export everything callers need at the crate root
pub use aliases::{DerivedKey, SecretBytes};
pub use codec::{EncodeOptions, Rendered};
pub use config::{load as load_config, EngineConfig};
pub use engine::{process, Result, Stage};
pub use enums::{
    AesKeySize, AesMode, Algorithm, ChainMode, Direction, Encoding, HashAlgorithm, KeyRole,
    PaddingScheme,
};
pub use error::{CipherError, ConfigError};
pub use random::{generate_iv, generate_key, generate_salt, random_bytes, OsRandom, RandomSource};
pub use request::{CipherRequest, CipherResult, CipherSpec, KdfSpec, KeyLengthRule, KeyMaterial};
