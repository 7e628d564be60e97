// src/stream.rs
//! Stream cipher adapter: ChaCha20, Salsa20 and ChaCha20-Poly1305
//!
//! The plain stream ciphers XOR a keystream positioned at an explicit
//! starting block counter, so a large input can be processed in
//! segments at caller-chosen offsets.

use chacha20::ChaCha20;
use chacha20poly1305::ChaCha20Poly1305;
use cipher::{KeyIvInit, StreamCipher, StreamCipherSeek};
use salsa20::Salsa20;

use crate::block::gcm::{open_with, seal_with};
use crate::consts::STREAM_BLOCK_LEN;
use crate::enums::Algorithm;
use crate::error::CipherError;

pub type Result<T> = std::result::Result<T, CipherError>;

const CHACHA20_POLY1305: &str = "ChaCha20-Poly1305";

/// XOR `data` with the keystream starting at block `counter`
///
/// Encryption and decryption are the same operation.
pub fn apply(
    algorithm: Algorithm,
    key: &[u8],
    nonce: &[u8],
    counter: u64,
    data: &[u8],
) -> Result<Vec<u8>> {
    match algorithm {
        Algorithm::ChaCha20 => {
            let cipher = ChaCha20::new_from_slices(key, nonce)
                .map_err(|e| CipherError::primitive("ChaCha20 init", e))?;
            keystream_xor(cipher, counter, data, "ChaCha20")
        }
        Algorithm::Salsa20 => {
            let cipher = Salsa20::new_from_slices(key, nonce)
                .map_err(|e| CipherError::primitive("Salsa20 init", e))?;
            keystream_xor(cipher, counter, data, "Salsa20")
        }
        other => Err(CipherError::UnsupportedCombination(format!(
            "{other} is not a stream cipher"
        ))),
    }
}

/// ChaCha20-Poly1305 encrypt → `ciphertext || tag`
pub fn seal(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    seal_with::<ChaCha20Poly1305>(key, nonce, plaintext, CHACHA20_POLY1305)
}

/// ChaCha20-Poly1305 verify + decrypt
pub fn open(key: &[u8], nonce: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
    open_with::<ChaCha20Poly1305>(key, nonce, sealed, CHACHA20_POLY1305)
}

fn keystream_xor<S>(mut cipher: S, counter: u64, data: &[u8], label: &str) -> Result<Vec<u8>>
where
    S: StreamCipher + StreamCipherSeek,
{
    let offset = u128::from(counter) * u128::from(STREAM_BLOCK_LEN);
    cipher
        .try_seek(offset)
        .map_err(|e| CipherError::primitive(&format!("{label} seek to block {counter}"), e))?;

    let mut buf = data.to_vec();
    cipher
        .try_apply_keystream(&mut buf)
        .map_err(|e| CipherError::primitive(&format!("{label} keystream"), e))?;
    Ok(buf)
}
