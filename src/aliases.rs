// src/aliases.rs
//! Re-exports secure-gate's ergonomic secret types
//!
//! Key material and derived keys live in these wrappers so they are
//! zeroized when dropped. Plaintext handed back to the caller is plain
//! `Vec<u8>`; clearing it is the caller's job.

pub use secure_gate::dynamic_alias;

// Caller-supplied key bytes (raw key or KDF passphrase)
dynamic_alias!(SecretBytes, Vec<u8>);

// Key bytes actually handed to a primitive
dynamic_alias!(DerivedKey, Vec<u8>);
