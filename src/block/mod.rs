// src/block/mod.rs
//! Block cipher mode engine
//!
//! Runs already-padded data through a block cipher in the requested mode.
//! AES, DES, 3DES and Blowfish go through the crate-provided chained
//! modes in [`native`]; Twofish is chained by hand in [`chaining`]. AES-GCM
//! has its own authenticated path in [`gcm`].

pub mod chaining;
pub mod gcm;
pub mod native;

use cipher::KeyInit;

use crate::enums::{AesMode, ChainMode};
use crate::error::CipherError;
use crate::request::CipherSpec;
use chaining::TwofishBlock;
use native::with_aes;

pub type Result<T> = std::result::Result<T, CipherError>;

/// Encrypt padded plaintext; `iv` is ignored by ECB
pub fn encrypt_blocks(
    spec: &CipherSpec,
    key: &[u8],
    iv: Option<&[u8]>,
    padded: &[u8],
) -> Result<Vec<u8>> {
    match *spec {
        CipherSpec::Aes { mode, .. } => match mode {
            AesMode::Cbc => with_aes!(key, Aes => {
                native::cbc_encrypt(new_cipher::<Aes>(key)?, require_iv(iv)?, padded)
            }),
            AesMode::Ecb => with_aes!(key, Aes => {
                native::ecb_encrypt(new_cipher::<Aes>(key)?, padded)
            }),
            AesMode::Cfb => native::aes_cfb(key, require_iv(iv)?, padded, true),
            AesMode::Ctr => native::aes_ctr(key, require_iv(iv)?, padded),
            AesMode::Ofb => native::aes_ofb(key, require_iv(iv)?, padded),
            AesMode::Gcm => Err(not_a_block_mode(spec)),
        },
        CipherSpec::Des { mode } => chained_encrypt(new_cipher::<des::Des>(key)?, mode, iv, padded),
        CipherSpec::TripleDes { mode } => {
            chained_encrypt(new_cipher::<des::TdesEde3>(key)?, mode, iv, padded)
        }
        CipherSpec::Blowfish { mode } => {
            chained_encrypt(new_cipher::<blowfish::Blowfish>(key)?, mode, iv, padded)
        }
        CipherSpec::Twofish { mode } => {
            let cipher = TwofishBlock::new(key)?;
            match mode {
                ChainMode::Cbc => chaining::cbc_encrypt(&cipher, require_iv(iv)?, padded),
                ChainMode::Ecb => chaining::ecb_encrypt(&cipher, padded),
            }
        }
        CipherSpec::ChaCha20 { .. } | CipherSpec::Salsa20 => Err(not_a_block_mode(spec)),
    }
}

/// Decrypt to padded plaintext; unpadding is the caller's next step
pub fn decrypt_blocks(
    spec: &CipherSpec,
    key: &[u8],
    iv: Option<&[u8]>,
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    match *spec {
        CipherSpec::Aes { mode, .. } => match mode {
            AesMode::Cbc => with_aes!(key, Aes => {
                native::cbc_decrypt(new_cipher::<Aes>(key)?, require_iv(iv)?, ciphertext)
            }),
            AesMode::Ecb => with_aes!(key, Aes => {
                native::ecb_decrypt(new_cipher::<Aes>(key)?, ciphertext)
            }),
            AesMode::Cfb => native::aes_cfb(key, require_iv(iv)?, ciphertext, false),
            // CTR and OFB are their own inverse
            AesMode::Ctr => native::aes_ctr(key, require_iv(iv)?, ciphertext),
            AesMode::Ofb => native::aes_ofb(key, require_iv(iv)?, ciphertext),
            AesMode::Gcm => Err(not_a_block_mode(spec)),
        },
        CipherSpec::Des { mode } => {
            chained_decrypt(new_cipher::<des::Des>(key)?, mode, iv, ciphertext)
        }
        CipherSpec::TripleDes { mode } => {
            chained_decrypt(new_cipher::<des::TdesEde3>(key)?, mode, iv, ciphertext)
        }
        CipherSpec::Blowfish { mode } => {
            chained_decrypt(new_cipher::<blowfish::Blowfish>(key)?, mode, iv, ciphertext)
        }
        CipherSpec::Twofish { mode } => {
            let cipher = TwofishBlock::new(key)?;
            match mode {
                ChainMode::Cbc => chaining::cbc_decrypt(&cipher, require_iv(iv)?, ciphertext),
                ChainMode::Ecb => chaining::ecb_decrypt(&cipher, ciphertext),
            }
        }
        CipherSpec::ChaCha20 { .. } | CipherSpec::Salsa20 => Err(not_a_block_mode(spec)),
    }
}

fn chained_encrypt<C>(
    cipher: C,
    mode: ChainMode,
    iv: Option<&[u8]>,
    data: &[u8],
) -> Result<Vec<u8>>
where
    C: cipher::BlockEncryptMut + cipher::BlockCipher,
{
    match mode {
        ChainMode::Cbc => native::cbc_encrypt(cipher, require_iv(iv)?, data),
        ChainMode::Ecb => native::ecb_encrypt(cipher, data),
    }
}

fn chained_decrypt<C>(
    cipher: C,
    mode: ChainMode,
    iv: Option<&[u8]>,
    data: &[u8],
) -> Result<Vec<u8>>
where
    C: cipher::BlockDecryptMut + cipher::BlockCipher,
{
    match mode {
        ChainMode::Cbc => native::cbc_decrypt(cipher, require_iv(iv)?, data),
        ChainMode::Ecb => native::ecb_decrypt(cipher, data),
    }
}

fn new_cipher<C: KeyInit>(key: &[u8]) -> Result<C> {
    C::new_from_slice(key).map_err(|e| CipherError::primitive("block cipher key schedule", e))
}

fn require_iv(iv: Option<&[u8]>) -> Result<&[u8]> {
    iv.ok_or_else(|| CipherError::PrimitiveFailure("chained mode reached without an IV".into()))
}

fn not_a_block_mode(spec: &CipherSpec) -> CipherError {
    CipherError::UnsupportedCombination(format!("{spec} is not handled by the block mode engine"))
}
