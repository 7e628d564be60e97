// src/error.rs
//! Public error types for the entire crate
//!
//! `CipherError` is the closed taxonomy every engine operation reports.
//! `ConfigError` covers loading engine defaults and job files only.

use thiserror::Error;

use crate::enums::{Algorithm, Encoding};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("invalid key length for {algorithm}: got {actual} bytes, expected {expected}")]
    InvalidKeyLength {
        algorithm: Algorithm,
        actual: usize,
        expected: String,
    },

    #[error("invalid IV/nonce length for {algorithm}: got {actual} bytes, expected {expected}")]
    InvalidIvOrNonceLength {
        algorithm: Algorithm,
        actual: usize,
        expected: String,
    },

    #[error("invalid padding: {0}")]
    InvalidPadding(String),

    #[error("unsupported combination: {0}")]
    UnsupportedCombination(String),

    #[error("authentication failed: ciphertext or tag was modified, or the key/nonce is wrong")]
    AuthenticationFailed,

    #[error("invalid {kind} encoding: {detail}")]
    InvalidEncoding { kind: Encoding, detail: String },

    #[error("secure random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    #[error("primitive failure: {0}")]
    PrimitiveFailure(String),
}

impl CipherError {
    /// Stable kind name for display next to the detail string
    pub fn kind(&self) -> &'static str {
        match self {
            CipherError::InvalidKeyLength { .. } => "InvalidKeyLength",
            CipherError::InvalidIvOrNonceLength { .. } => "InvalidIvOrNonceLength",
            CipherError::InvalidPadding(_) => "InvalidPadding",
            CipherError::UnsupportedCombination(_) => "UnsupportedCombination",
            CipherError::AuthenticationFailed => "AuthenticationFailed",
            CipherError::InvalidEncoding { .. } => "InvalidEncoding",
            CipherError::RandomSourceUnavailable(_) => "RandomSourceUnavailable",
            CipherError::PrimitiveFailure(_) => "PrimitiveFailure",
        }
    }

    pub(crate) fn encoding(kind: Encoding, detail: impl ToString) -> Self {
        CipherError::InvalidEncoding {
            kind,
            detail: detail.to_string(),
        }
    }

    pub(crate) fn primitive(context: &str, err: impl std::fmt::Display) -> Self {
        CipherError::PrimitiveFailure(format!("{context}: {err}"))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
