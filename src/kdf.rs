// src/kdf.rs
//! Key derivation: PBKDF2 and HKDF over SHA-256 / SHA-512
//!
//! The module only knows how many bytes to produce; which cipher they
//! key is the orchestrator's concern.

use hkdf::Hkdf;
use pbkdf2::pbkdf2_hmac;
use sha2::{Sha256, Sha512};

use crate::aliases::DerivedKey;
use crate::enums::HashAlgorithm;
use crate::error::CipherError;
use crate::request::KdfSpec;

pub type Result<T> = std::result::Result<T, CipherError>;

/// Stretch `passphrase` + `salt` into exactly `output_len` bytes
///
/// Returns `UnsupportedCombination` for `KdfSpec::None`; callers with no
/// KDF use the key as-is.
pub fn derive(
    kdf: &KdfSpec,
    passphrase: &[u8],
    salt: &[u8],
    output_len: usize,
) -> Result<DerivedKey> {
    let mut out = vec![0u8; output_len];

    match kdf {
        KdfSpec::None => {
            return Err(CipherError::UnsupportedCombination(
                "no KDF selected for key derivation".into(),
            ))
        }
        KdfSpec::Pbkdf2 { iterations, hash } => {
            if *iterations == 0 {
                return Err(CipherError::UnsupportedCombination(
                    "PBKDF2 iteration count must be at least 1".into(),
                ));
            }
            match hash {
                HashAlgorithm::Sha256 => {
                    pbkdf2_hmac::<Sha256>(passphrase, salt, *iterations, &mut out)
                }
                HashAlgorithm::Sha512 => {
                    pbkdf2_hmac::<Sha512>(passphrase, salt, *iterations, &mut out)
                }
            }
        }
        KdfSpec::Hkdf { hash, info } => match hash {
            HashAlgorithm::Sha256 => Hkdf::<Sha256>::new(Some(salt), passphrase)
                .expand(info, &mut out)
                .map_err(|e| CipherError::primitive("HKDF-SHA256 expand", e))?,
            HashAlgorithm::Sha512 => Hkdf::<Sha512>::new(Some(salt), passphrase)
                .expand(info, &mut out)
                .map_err(|e| CipherError::primitive("HKDF-SHA512 expand", e))?,
        },
    }

    Ok(DerivedKey::new(out))
}
