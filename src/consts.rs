// src/consts.rs
//! Shared constants: block geometry, nonce sizes and KDF defaults

use std::ops::RangeInclusive;

/// AES and Twofish block size
pub const BLOCK_SIZE_128: usize = 16;

/// DES, 3DES and Blowfish block size
pub const BLOCK_SIZE_64: usize = 8;

pub const DES_KEY_LEN: usize = 8;
pub const TRIPLE_DES_KEY_LEN: usize = 24;

/// Blowfish accepts any key length in this range (inclusive)
pub const BLOWFISH_KEY_MIN: usize = 4;
pub const BLOWFISH_KEY_MAX: usize = 56;

/// Key length produced by a KDF when the target is Blowfish
pub const BLOWFISH_DERIVED_KEY_LEN: usize = 16;

pub const TWOFISH_KEY_LENS: [usize; 4] = [8, 16, 24, 32];

/// Key length produced by a KDF when the target is Twofish
pub const TWOFISH_DERIVED_KEY_LEN: usize = 32;

/// ChaCha20 and Salsa20 both take 256-bit keys
pub const STREAM_KEY_LEN: usize = 32;

pub const CHACHA20_NONCE_LEN: usize = 12;
pub const SALSA20_NONCE_LEN: usize = 8;

/// Bytes of keystream per stream-cipher block (one counter step)
pub const STREAM_BLOCK_LEN: u64 = 64;

/// Recommended AES-GCM nonce length
pub const GCM_NONCE_LEN: usize = 12;

/// Nonce lengths the AES-GCM provider is instantiated for
pub const GCM_NONCE_LENS: RangeInclusive<usize> = 8..=16;

/// AES-GCM and Poly1305 tag length (128-bit)
pub const AEAD_TAG_LEN: usize = 16;

/// Default PBKDF2 iteration count
// ~0.1s on modern hardware for SHA-256
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 100_000;

pub const DEFAULT_SALT_LEN: usize = 16;

/// Env var naming the engine config file
pub const CONFIG_ENV_VAR: &str = "CIPHER_ENGINE_CONFIG";

pub const DEFAULT_CONFIG_PATH: &str = "cipher-engine.toml";
