// src/padding.rs
//! Block padding schemes
//!
//! Both directions return fresh buffers; input slices are never touched.
//! `NoPadding` alignment is the orchestrator's job and is checked before
//! anything reaches this module.

use crate::enums::PaddingScheme;
use crate::error::CipherError;
use crate::random::{OsRandom, RandomSource};

pub type Result<T> = std::result::Result<T, CipherError>;

const ISO97971_MARKER: u8 = 0x80;

/// Number of bytes a count-terminated scheme appends (1..=block_size)
pub fn padding_len(data_len: usize, block_size: usize) -> usize {
    block_size - (data_len % block_size)
}

/// Pad `data` to a multiple of `block_size` under `scheme`
pub fn pad(data: &[u8], scheme: PaddingScheme, block_size: usize) -> Result<Vec<u8>> {
    check_block_size(block_size)?;

    let n = padding_len(data.len(), block_size);
    let mut out = Vec::with_capacity(data.len() + n);
    out.extend_from_slice(data);

    match scheme {
        PaddingScheme::Pkcs7 => out.resize(data.len() + n, n as u8),
        PaddingScheme::AnsiX923 => {
            out.resize(data.len() + n - 1, 0);
            out.push(n as u8);
        }
        PaddingScheme::Iso10126 => {
            let mut filler = vec![0u8; n - 1];
            OsRandom.fill(&mut filler)?;
            out.extend_from_slice(&filler);
            out.push(n as u8);
        }
        PaddingScheme::Iso97971 => {
            out.push(ISO97971_MARKER);
            out.resize(data.len() + n, 0);
        }
        PaddingScheme::ZeroPadding => {
            // Aligned input gets nothing
            let zeros = n % block_size;
            out.resize(data.len() + zeros, 0);
        }
        PaddingScheme::NoPadding => {}
    }

    Ok(out)
}

/// Strip padding added by [`pad`], validating its structure where the
/// scheme allows it
pub fn unpad(data: &[u8], scheme: PaddingScheme, block_size: usize) -> Result<Vec<u8>> {
    check_block_size(block_size)?;

    match scheme {
        PaddingScheme::Pkcs7 => {
            let n = trailing_count(data, block_size)?;
            let body = data.len() - n;
            if data[body..].iter().any(|&b| b as usize != n) {
                return Err(CipherError::InvalidPadding(
                    "PKCS#7 padding bytes do not all equal the pad length".into(),
                ));
            }
            Ok(data[..body].to_vec())
        }
        PaddingScheme::AnsiX923 => {
            let n = trailing_count(data, block_size)?;
            let body = data.len() - n;
            if data[body..data.len() - 1].iter().any(|&b| b != 0) {
                return Err(CipherError::InvalidPadding(
                    "ANSI X.923 filler bytes must be zero".into(),
                ));
            }
            Ok(data[..body].to_vec())
        }
        PaddingScheme::Iso10126 => {
            // Filler is random; only the count can be checked
            let n = trailing_count(data, block_size)?;
            Ok(data[..data.len() - n].to_vec())
        }
        PaddingScheme::Iso97971 => {
            let zeros = data.iter().rev().take_while(|&&b| b == 0).count();
            if zeros >= block_size || zeros == data.len() {
                return Err(CipherError::InvalidPadding(
                    "ISO/IEC 9797-1 marker byte not found in final block".into(),
                ));
            }
            let marker = data.len() - zeros - 1;
            if data[marker] != ISO97971_MARKER {
                return Err(CipherError::InvalidPadding(format!(
                    "ISO/IEC 9797-1 expected 0x80 marker, found {:#04x}",
                    data[marker]
                )));
            }
            Ok(data[..marker].to_vec())
        }
        PaddingScheme::ZeroPadding => {
            let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
            Ok(data[..end].to_vec())
        }
        PaddingScheme::NoPadding => Ok(data.to_vec()),
    }
}

/// Read and range-check the final pad-count byte
fn trailing_count(data: &[u8], block_size: usize) -> Result<usize> {
    let Some(&last) = data.last() else {
        return Err(CipherError::InvalidPadding("padded data is empty".into()));
    };
    let n = last as usize;
    if n == 0 || n > block_size || n > data.len() {
        return Err(CipherError::InvalidPadding(format!(
            "pad length {n} out of range for {block_size}-byte blocks"
        )));
    }
    Ok(n)
}

fn check_block_size(block_size: usize) -> Result<()> {
    if (1..=255).contains(&block_size) {
        Ok(())
    } else {
        Err(CipherError::UnsupportedCombination(format!(
            "block size {block_size} cannot be padded"
        )))
    }
}
