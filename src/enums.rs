// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the closed sets a request is built from:
//! algorithms, modes, padding schemes, encodings and hash choices.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported cipher algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Aes,
    ChaCha20,
    Salsa20,
    Twofish,
    Blowfish,
    Des,
    TripleDes,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::Aes => "AES",
            Algorithm::ChaCha20 => "ChaCha20",
            Algorithm::Salsa20 => "Salsa20",
            Algorithm::Twofish => "Twofish",
            Algorithm::Blowfish => "Blowfish",
            Algorithm::Des => "DES",
            Algorithm::TripleDes => "TripleDES",
        })
    }
}

/// AES modes of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AesMode {
    Gcm,
    Cbc,
    Cfb,
    Ctr,
    Ofb,
    /// Insecure; kept for parity with the other block ciphers
    Ecb,
}

/// Modes shared by DES, 3DES, Blowfish and Twofish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainMode {
    Cbc,
    Ecb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AesKeySize {
    #[serde(rename = "128")]
    Aes128,
    #[serde(rename = "192")]
    Aes192,
    #[serde(rename = "256")]
    Aes256,
}

impl AesKeySize {
    pub fn bytes(self) -> usize {
        match self {
            AesKeySize::Aes128 => 16,
            AesKeySize::Aes192 => 24,
            AesKeySize::Aes256 => 32,
        }
    }
}

/// Block padding schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaddingScheme {
    #[default]
    Pkcs7,
    AnsiX923,
    Iso10126,
    Iso97971,
    /// Unpad cannot tell padding zeros from trailing zeros in the plaintext
    ZeroPadding,
    NoPadding,
}

/// Textual (or raw) representation of a byte buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Utf8,
    Base64,
    Base64Url,
    Hex,
    Binary,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Base64 => "Base64",
            Encoding::Base64Url => "Base64url",
            Encoding::Hex => "hex",
            Encoding::Binary => "binary",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha512,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// How the engine should treat the supplied key bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyRole {
    Raw,
    KdfInput,
}
