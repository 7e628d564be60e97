// tests/common.rs
//! Shared test utilities: logging setup and request builders
#![allow(dead_code)]

use cipher_engine::{CipherRequest, CipherSpec, Direction, KeyMaterial};

#[cfg(feature = "logging")]
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Route engine tracing into the test writer; respects RUST_LOG=
/// Safe to call from every test
pub fn setup() {
    #[cfg(feature = "logging")]
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

/// `0x00, 0x01, ..` of length `len`
pub fn counting(len: usize) -> Vec<u8> {
    (0..len).map(|i| i as u8).collect()
}

/// Raw-key request with binary input
pub fn request(
    direction: Direction,
    spec: CipherSpec,
    key: &[u8],
    iv: Option<&[u8]>,
    input: &[u8],
) -> CipherRequest {
    let mut req = CipherRequest::new(direction, spec, KeyMaterial::raw(key.to_vec()))
        .with_input(input.to_vec());
    if let Some(iv) = iv {
        req = req.with_iv(iv.to_vec());
    }
    req
}
