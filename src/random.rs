// src/random.rs
//! Random material generator: keys, IVs, nonces and salts
//!
//! Backed by the operating system CSPRNG, which is safe to call from
//! any number of threads at once.

use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::config;
use crate::error::CipherError;
use crate::request::CipherSpec;

pub type Result<T> = std::result::Result<T, CipherError>;

/// A secure random byte source
pub trait RandomSource {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()>;
}

/// The operating system's CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| CipherError::RandomSourceUnavailable(e.to_string()))
    }
}

/// `len` fresh random bytes from the OS
pub fn random_bytes(len: usize) -> Result<Vec<u8>> {
    random_bytes_from(&mut OsRandom, len)
}

pub fn random_bytes_from<R: RandomSource + ?Sized>(source: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; len];
    source.fill(&mut buf)?;
    Ok(buf)
}

/// A raw key of the exact length `spec` requires
///
/// Blowfish gets its KDF length (16 bytes); Twofish gets 32.
pub fn generate_key(spec: &CipherSpec) -> Result<Vec<u8>> {
    random_bytes(spec.derived_key_len())
}

/// An IV or nonce for `spec`, or `None` for ECB
pub fn generate_iv(spec: &CipherSpec) -> Result<Option<Vec<u8>>> {
    spec.iv_len().map(random_bytes).transpose()
}

/// A KDF salt of the configured length
pub fn generate_salt() -> Result<Vec<u8>> {
    random_bytes(config::load().kdf.salt_len)
}
