// src/engine.rs
//! Cipher orchestrator: the public entry point
//!
//! One request moves through `Validating → (DerivingKey)? → Ciphering →
//! Encoding → Done`. Any failure ends the request in `Failed` at the stage
//! it happened in. Validation finishes before any key material reaches a
//! primitive.

use std::fmt;

use tracing::{debug, warn};

use crate::aliases::DerivedKey;
use crate::block::{self, gcm};
use crate::codec::{self, Rendered};
use crate::consts::{GCM_NONCE_LENS, STREAM_BLOCK_LEN};
use crate::enums::{AesMode, Direction, KeyRole, PaddingScheme};
use crate::error::CipherError;
use crate::kdf;
use crate::padding;
use crate::request::{CipherRequest, CipherResult, CipherSpec, KdfSpec};
use crate::stream;

pub type Result<T> = std::result::Result<T, CipherError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    DerivingKey,
    Ciphering,
    Encoding,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Padding decision for a block mode
#[derive(Debug, Clone, Copy)]
struct BlockPlan {
    scheme: PaddingScheme,
    block_size: usize,
}

/// Everything validation settled, ready for the primitives
#[derive(Debug)]
struct Plan<'a> {
    input: Vec<u8>,
    iv: Option<&'a [u8]>,
    counter: u64,
    block: Option<BlockPlan>,
}

/// Run one request to completion
pub fn process(request: &CipherRequest) -> Result<CipherResult> {
    let mut stage = Stage::Validating;
    let outcome = run(request, &mut stage);

    match &outcome {
        Ok(result) => debug!(
            stage = %Stage::Done,
            cipher = %request.cipher,
            output_len = result.bytes.len(),
            lossy = result.is_lossy_text,
            "cipher request complete"
        ),
        Err(e) => warn!(
            failed_in = %stage,
            cipher = %request.cipher,
            direction = ?request.direction,
            kind = e.kind(),
            error = %e,
            "cipher request failed"
        ),
    }

    outcome
}

fn run(request: &CipherRequest, stage: &mut Stage) -> Result<CipherResult> {
    enter(stage, Stage::Validating, request);
    let plan = validate(request)?;

    let key = if request.kdf.is_none() {
        DerivedKey::new(request.key.expose_secret().to_vec())
    } else {
        enter(stage, Stage::DerivingKey, request);
        kdf::derive(
            &request.kdf,
            request.key.expose_secret(),
            &request.salt,
            request.cipher.derived_key_len(),
        )?
    };

    enter(stage, Stage::Ciphering, request);
    let bytes = apply_cipher(request, key.expose_secret(), &plan)?;
    drop(key);

    enter(stage, Stage::Encoding, request);
    let (text, is_lossy_text) = match codec::encode(
        &bytes,
        request.output_encoding,
        &request.output_options,
    ) {
        Rendered::Text(text) => (Some(text), false),
        Rendered::LossyText(text) => (Some(text), true),
        Rendered::Binary => (None, false),
    };

    Ok(CipherResult {
        bytes,
        text,
        is_lossy_text,
    })
}

fn enter(stage: &mut Stage, next: Stage, request: &CipherRequest) {
    *stage = next;
    debug!(
        stage = %next,
        cipher = %request.cipher,
        direction = ?request.direction,
        "cipher request stage"
    );
}

fn validate(request: &CipherRequest) -> Result<Plan<'_>> {
    let spec = &request.cipher;
    let algorithm = spec.algorithm();

    let input = codec::decode_input(&request.input, request.input_encoding)?;

    // Key
    match (request.key.role(), &request.kdf) {
        (KeyRole::Raw, KdfSpec::None) => {
            let rule = spec.key_length_rule();
            if !rule.allows(request.key.len()) {
                return Err(CipherError::InvalidKeyLength {
                    algorithm,
                    actual: request.key.len(),
                    expected: rule.to_string(),
                });
            }
        }
        (KeyRole::KdfInput, KdfSpec::None) => {
            return Err(CipherError::UnsupportedCombination(
                "passphrase key material needs a KDF".into(),
            ))
        }
        (KeyRole::Raw, _) => {
            return Err(CipherError::UnsupportedCombination(
                "raw key material cannot be fed through a KDF".into(),
            ))
        }
        (KeyRole::KdfInput, KdfSpec::Pbkdf2 { iterations: 0, .. }) => {
            return Err(CipherError::UnsupportedCombination(
                "PBKDF2 iteration count must be at least 1".into(),
            ))
        }
        (KeyRole::KdfInput, _) => {}
    }

    // IV / nonce
    let iv = request.iv.as_deref();
    let iv = match spec {
        CipherSpec::Aes {
            mode: AesMode::Gcm, ..
        } => {
            let nonce = iv.unwrap_or_default();
            if !GCM_NONCE_LENS.contains(&nonce.len()) {
                return Err(CipherError::InvalidIvOrNonceLength {
                    algorithm,
                    actual: nonce.len(),
                    expected: format!("{GCM_NONCE_LENS:?} bytes"),
                });
            }
            Some(nonce)
        }
        _ => match spec.iv_len() {
            Some(expected) => {
                let actual = iv.map_or(0, <[u8]>::len);
                if actual != expected || iv.is_none() {
                    return Err(CipherError::InvalidIvOrNonceLength {
                        algorithm,
                        actual,
                        expected: format!("exactly {expected} bytes"),
                    });
                }
                iv
            }
            None => {
                if iv.is_some() {
                    debug!(cipher = %spec, "mode takes no IV, ignoring supplied IV");
                }
                None
            }
        },
    };

    // Counter
    let counter = request.counter.unwrap_or(0);
    if spec.uses_counter() {
        let (last_block, width) = match spec {
            CipherSpec::ChaCha20 { .. } => (u64::from(u32::MAX), 32),
            _ => (u64::MAX, 64),
        };
        if counter > last_block {
            return Err(CipherError::UnsupportedCombination(format!(
                "{spec} block counter {counter} does not fit in {width} bits"
            )));
        }
        // The counter must not wrap within this input
        let blocks = (input.len() as u64).div_ceil(STREAM_BLOCK_LEN);
        match counter.checked_add(blocks) {
            Some(end) if end <= last_block => {}
            _ => {
                return Err(CipherError::UnsupportedCombination(format!(
                    "{} bytes from {spec} block {counter} exhausts the {width}-bit counter",
                    input.len()
                )))
            }
        }
    } else if request.counter.is_some() {
        debug!(cipher = %spec, "mode takes no counter, ignoring supplied counter");
    }

    // Padding / block alignment
    let block = match (spec.block_size(), request.effective_padding()) {
        (Some(block_size), Some(scheme)) => {
            match request.direction {
                Direction::Encrypt => {
                    if scheme == PaddingScheme::NoPadding && input.len() % block_size != 0 {
                        return Err(CipherError::UnsupportedCombination(format!(
                            "NoPadding needs a multiple of {block_size} bytes, got {}",
                            input.len()
                        )));
                    }
                }
                Direction::Decrypt => {
                    if input.len() % block_size != 0 {
                        return Err(CipherError::UnsupportedCombination(format!(
                            "ciphertext of {} bytes is not whole {block_size}-byte blocks",
                            input.len()
                        )));
                    }
                }
            }
            Some(BlockPlan { scheme, block_size })
        }
        _ => {
            if request.padding.is_some() {
                debug!(cipher = %spec, "mode is not padded, ignoring padding scheme");
            }
            None
        }
    };

    Ok(Plan {
        input,
        iv,
        counter,
        block,
    })
}

fn apply_cipher(request: &CipherRequest, key: &[u8], plan: &Plan<'_>) -> Result<Vec<u8>> {
    let spec = &request.cipher;
    let encrypt = request.direction == Direction::Encrypt;
    let nonce = plan.iv.unwrap_or_default();

    match spec {
        CipherSpec::Aes {
            mode: AesMode::Gcm, ..
        } => {
            if encrypt {
                gcm::seal(key, nonce, &plan.input)
            } else {
                gcm::open(key, nonce, &plan.input)
            }
        }
        CipherSpec::ChaCha20 { aead: true } => {
            if encrypt {
                stream::seal(key, nonce, &plan.input)
            } else {
                stream::open(key, nonce, &plan.input)
            }
        }
        CipherSpec::ChaCha20 { aead: false } | CipherSpec::Salsa20 => {
            stream::apply(spec.algorithm(), key, nonce, plan.counter, &plan.input)
        }
        CipherSpec::Aes { .. }
        | CipherSpec::Des { .. }
        | CipherSpec::TripleDes { .. }
        | CipherSpec::Blowfish { .. }
        | CipherSpec::Twofish { .. } => {
            let Some(BlockPlan { scheme, block_size }) = plan.block else {
                return Err(CipherError::UnsupportedCombination(format!(
                    "{spec} reached the block engine without a padding plan"
                )));
            };
            if encrypt {
                let padded = padding::pad(&plan.input, scheme, block_size)?;
                block::encrypt_blocks(spec, key, plan.iv, &padded)
            } else {
                let padded = block::decrypt_blocks(spec, key, plan.iv, &plan.input)?;
                padding::unpad(&padded, scheme, block_size)
            }
        }
    }
}
