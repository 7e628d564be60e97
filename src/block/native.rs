// src/block/native.rs
//! Chained modes provided by the primitive crates
//!
//! Data arriving here is already padded to a whole number of blocks, so
//! every mode runs with `NoPadding`; padding is never applied twice.

use cipher::block_padding::NoPadding;
use cipher::crypto_common::InnerInit;
use cipher::{
    AsyncStreamCipher, BlockCipher, BlockDecryptMut, BlockEncryptMut, InnerIvInit, KeyIvInit,
    StreamCipher,
};

use crate::error::CipherError;

pub type Result<T> = std::result::Result<T, CipherError>;

/// Run `$body` with `$aes` bound to the AES variant matching `$key`'s length
macro_rules! with_aes {
    ($key:expr, $aes:ident => $body:expr) => {
        match $key.len() {
            16 => {
                type $aes = aes::Aes128;
                $body
            }
            24 => {
                type $aes = aes::Aes192;
                $body
            }
            32 => {
                type $aes = aes::Aes256;
                $body
            }
            n => Err(CipherError::PrimitiveFailure(format!(
                "AES key of {n} bytes reached the mode engine"
            ))),
        }
    };
}

pub(crate) use with_aes;

pub fn cbc_encrypt<C>(cipher: C, iv: &[u8], data: &[u8]) -> Result<Vec<u8>>
where
    C: BlockEncryptMut + BlockCipher,
{
    let mode = cbc::Encryptor::<C>::inner_iv_slice_init(cipher, iv)
        .map_err(|e| CipherError::primitive("CBC IV", e))?;
    let mut buf = data.to_vec();
    let len = mode
        .encrypt_padded_mut::<NoPadding>(&mut buf, data.len())
        .map_err(|e| CipherError::primitive("CBC encrypt", e))?
        .len();
    buf.truncate(len);
    Ok(buf)
}

pub fn cbc_decrypt<C>(cipher: C, iv: &[u8], data: &[u8]) -> Result<Vec<u8>>
where
    C: BlockDecryptMut + BlockCipher,
{
    let mode = cbc::Decryptor::<C>::inner_iv_slice_init(cipher, iv)
        .map_err(|e| CipherError::primitive("CBC IV", e))?;
    let mut buf = data.to_vec();
    let len = mode
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|e| CipherError::primitive("CBC decrypt", e))?
        .len();
    buf.truncate(len);
    Ok(buf)
}

pub fn ecb_encrypt<C>(cipher: C, data: &[u8]) -> Result<Vec<u8>>
where
    C: BlockEncryptMut + BlockCipher,
{
    let mode = ecb::Encryptor::<C>::inner_init(cipher);
    let mut buf = data.to_vec();
    let len = mode
        .encrypt_padded_mut::<NoPadding>(&mut buf, data.len())
        .map_err(|e| CipherError::primitive("ECB encrypt", e))?
        .len();
    buf.truncate(len);
    Ok(buf)
}

pub fn ecb_decrypt<C>(cipher: C, data: &[u8]) -> Result<Vec<u8>>
where
    C: BlockDecryptMut + BlockCipher,
{
    let mode = ecb::Decryptor::<C>::inner_init(cipher);
    let mut buf = data.to_vec();
    let len = mode
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|e| CipherError::primitive("ECB decrypt", e))?
        .len();
    buf.truncate(len);
    Ok(buf)
}

/// Full-block CFB (CFB-128)
pub fn aes_cfb(key: &[u8], iv: &[u8], data: &[u8], encrypt: bool) -> Result<Vec<u8>> {
    let mut buf = data.to_vec();
    with_aes!(key, Aes => {
        if encrypt {
            cfb_mode::Encryptor::<Aes>::new_from_slices(key, iv)
                .map_err(|e| CipherError::primitive("AES-CFB init", e))?
                .encrypt(&mut buf);
        } else {
            cfb_mode::Decryptor::<Aes>::new_from_slices(key, iv)
                .map_err(|e| CipherError::primitive("AES-CFB init", e))?
                .decrypt(&mut buf);
        }
        Ok(buf)
    })
}

/// CTR with a full 128-bit big-endian counter block; symmetric
pub fn aes_ctr(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut buf = data.to_vec();
    with_aes!(key, Aes => {
        ctr::Ctr128BE::<Aes>::new_from_slices(key, iv)
            .map_err(|e| CipherError::primitive("AES-CTR init", e))?
            .try_apply_keystream(&mut buf)
            .map_err(|e| CipherError::primitive("AES-CTR keystream", e))?;
        Ok(buf)
    })
}

/// OFB; symmetric
pub fn aes_ofb(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut buf = data.to_vec();
    with_aes!(key, Aes => {
        ofb::Ofb::<Aes>::new_from_slices(key, iv)
            .map_err(|e| CipherError::primitive("AES-OFB init", e))?
            .try_apply_keystream(&mut buf)
            .map_err(|e| CipherError::primitive("AES-OFB keystream", e))?;
        Ok(buf)
    })
}
