// src/block/chaining.rs
//! Hand-driven CBC/ECB for ciphers that only expose a one-block primitive
//!
//! Twofish is the only such cipher here. The loop is generic over
//! [`SingleBlockCipher`] so it can be tested against a toy cipher.
//!
//! CBC encrypt: `C_i = E(P_i ^ C_{i-1})`, `C_0 = IV`.
//! CBC decrypt: `P_i = D(C_i) ^ C_{i-1}`, where `C_{i-1}` is the
//! *ciphertext* block just consumed, never the recovered plaintext.

use twofish::cipher::generic_array::GenericArray;
use twofish::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use twofish::Twofish;

use crate::aliases::DerivedKey;
use crate::consts::BLOCK_SIZE_128;
use crate::enums::Algorithm;
use crate::error::CipherError;

pub type Result<T> = std::result::Result<T, CipherError>;

/// A raw block cipher: one block in, one block out, no chaining
pub trait SingleBlockCipher {
    fn block_size(&self) -> usize;

    /// Encrypt exactly one block in place
    fn encrypt_block(&self, block: &mut [u8]);

    /// Decrypt exactly one block in place
    fn decrypt_block(&self, block: &mut [u8]);
}

/// Twofish behind the single-block interface
pub struct TwofishBlock {
    cipher: Twofish,
}

impl TwofishBlock {
    /// Keys of 8 bytes are zero-extended to 16, per Twofish's short-key rule
    pub fn new(key: &[u8]) -> Result<Self> {
        let key = match key.len() {
            8 => {
                let mut extended = vec![0u8; BLOCK_SIZE_128];
                extended[..8].copy_from_slice(key);
                DerivedKey::new(extended)
            }
            _ => DerivedKey::new(key.to_vec()),
        };
        let cipher = Twofish::new_from_slice(key.expose_secret()).map_err(|_| {
            CipherError::InvalidKeyLength {
                algorithm: Algorithm::Twofish,
                actual: key.expose_secret().len(),
                expected: "one of 8/16/24/32 bytes".into(),
            }
        })?;
        Ok(TwofishBlock { cipher })
    }
}

impl SingleBlockCipher for TwofishBlock {
    fn block_size(&self) -> usize {
        BLOCK_SIZE_128
    }

    fn encrypt_block(&self, block: &mut [u8]) {
        self.cipher.encrypt_block(GenericArray::from_mut_slice(block));
    }

    fn decrypt_block(&self, block: &mut [u8]) {
        self.cipher.decrypt_block(GenericArray::from_mut_slice(block));
    }
}

pub fn cbc_encrypt<C: SingleBlockCipher + ?Sized>(
    cipher: &C,
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>> {
    let bs = check_geometry(cipher, Some(iv), data)?;
    let mut out = Vec::with_capacity(data.len());
    let mut prev = iv.to_vec();

    for plain in data.chunks_exact(bs) {
        let mut block: Vec<u8> = plain.iter().zip(&prev).map(|(p, c)| p ^ c).collect();
        cipher.encrypt_block(&mut block);
        out.extend_from_slice(&block);
        prev = block;
    }

    Ok(out)
}

pub fn cbc_decrypt<C: SingleBlockCipher + ?Sized>(
    cipher: &C,
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>> {
    let bs = check_geometry(cipher, Some(iv), data)?;
    let mut out = Vec::with_capacity(data.len());
    let mut prev: &[u8] = iv;

    for encrypted in data.chunks_exact(bs) {
        let mut block = encrypted.to_vec();
        cipher.decrypt_block(&mut block);
        out.extend(block.iter().zip(prev).map(|(d, c)| d ^ c));
        prev = encrypted;
    }

    Ok(out)
}

pub fn ecb_encrypt<C: SingleBlockCipher + ?Sized>(cipher: &C, data: &[u8]) -> Result<Vec<u8>> {
    let bs = check_geometry(cipher, None, data)?;
    let mut out = data.to_vec();
    for block in out.chunks_exact_mut(bs) {
        cipher.encrypt_block(block);
    }
    Ok(out)
}

pub fn ecb_decrypt<C: SingleBlockCipher + ?Sized>(cipher: &C, data: &[u8]) -> Result<Vec<u8>> {
    let bs = check_geometry(cipher, None, data)?;
    let mut out = data.to_vec();
    for block in out.chunks_exact_mut(bs) {
        cipher.decrypt_block(block);
    }
    Ok(out)
}

/// Data must be whole blocks and the IV exactly one block
fn check_geometry<C: SingleBlockCipher + ?Sized>(
    cipher: &C,
    iv: Option<&[u8]>,
    data: &[u8],
) -> Result<usize> {
    let bs = cipher.block_size();
    if data.len() % bs != 0 {
        return Err(CipherError::UnsupportedCombination(format!(
            "{} bytes is not a whole number of {bs}-byte blocks",
            data.len()
        )));
    }
    if let Some(iv) = iv {
        if iv.len() != bs {
            return Err(CipherError::InvalidIvOrNonceLength {
                algorithm: Algorithm::Twofish,
                actual: iv.len(),
                expected: format!("exactly {bs} bytes"),
            });
        }
    }
    Ok(bs)
}
