// src/block/gcm.rs
//! AES-GCM: the authenticated block mode
//!
//! No padding step. Output is `ciphertext || 16-byte tag`; a tag that
//! fails to verify is always `AuthenticationFailed`, never plaintext.

use aes_gcm::aead::consts::{U10, U11, U12, U13, U14, U15, U16, U8, U9};
use aes_gcm::aead::generic_array::typenum::Unsigned;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, Nonce};
use aes_gcm::AesGcm;

use super::native::with_aes;
use crate::consts::GCM_NONCE_LENS;
use crate::enums::Algorithm;
use crate::error::CipherError;

pub type Result<T> = std::result::Result<T, CipherError>;

/// Binds `$n` to the typenum for a nonce length in `GCM_NONCE_LENS`
macro_rules! with_nonce_len {
    (@ $size:ident, $n:ident => $body:expr) => {{
        type $n = $size;
        $body
    }};
    ($len:expr, $n:ident => $body:expr) => {
        match $len {
            8 => with_nonce_len!(@ U8, $n => $body),
            9 => with_nonce_len!(@ U9, $n => $body),
            10 => with_nonce_len!(@ U10, $n => $body),
            11 => with_nonce_len!(@ U11, $n => $body),
            12 => with_nonce_len!(@ U12, $n => $body),
            13 => with_nonce_len!(@ U13, $n => $body),
            14 => with_nonce_len!(@ U14, $n => $body),
            15 => with_nonce_len!(@ U15, $n => $body),
            16 => with_nonce_len!(@ U16, $n => $body),
            n => Err(unsupported_nonce(n)),
        }
    };
}

/// AES-GCM encrypt; the nonce may be any length in `GCM_NONCE_LENS`
pub fn seal(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    with_aes!(key, Aes => with_nonce_len!(iv.len(), N => {
        seal_with::<AesGcm<Aes, N>>(key, iv, plaintext, "AES-GCM")
    }))
}

/// AES-GCM verify + decrypt, with the same nonce lengths as [`seal`]
pub fn open(key: &[u8], iv: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
    with_aes!(key, Aes => with_nonce_len!(iv.len(), N => {
        open_with::<AesGcm<Aes, N>>(key, iv, sealed, "AES-GCM")
    }))
}

fn unsupported_nonce(actual: usize) -> CipherError {
    CipherError::InvalidIvOrNonceLength {
        algorithm: Algorithm::Aes,
        actual,
        expected: format!("a GCM nonce of {GCM_NONCE_LENS:?} bytes"),
    }
}

/// Encrypt with any AEAD, appending its tag
pub(crate) fn seal_with<A: KeyInit + Aead>(
    key: &[u8],
    nonce: &[u8],
    plaintext: &[u8],
    label: &str,
) -> Result<Vec<u8>> {
    let aead = A::new_from_slice(key).map_err(|e| CipherError::primitive(label, e))?;
    let nonce = nonce_for::<A>(nonce, label)?;
    aead.encrypt(nonce, plaintext).map_err(|e| CipherError::primitive(label, e))
}

/// Verify the tag and decrypt; any mismatch is `AuthenticationFailed`
pub(crate) fn open_with<A: KeyInit + Aead>(
    key: &[u8],
    nonce: &[u8],
    sealed: &[u8],
    label: &str,
) -> Result<Vec<u8>> {
    let aead = A::new_from_slice(key).map_err(|e| CipherError::primitive(label, e))?;
    let nonce = nonce_for::<A>(nonce, label)?;
    aead.decrypt(nonce, sealed).map_err(|_| CipherError::AuthenticationFailed)
}

fn nonce_for<'a, A: AeadCore>(nonce: &'a [u8], label: &str) -> Result<&'a Nonce<A>> {
    let expected = <A::NonceSize as Unsigned>::USIZE;
    if nonce.len() != expected {
        return Err(CipherError::PrimitiveFailure(format!(
            "{label} nonce of {} bytes, provider expects {expected}",
            nonce.len()
        )));
    }
    Ok(Nonce::<A>::from_slice(nonce))
}
