// src/codec.rs
//! Byte codec: textual representations of byte buffers
//!
//! Decoding is strict: malformed alphabets, bad Base64 padding and odd or
//! non-hex digits are rejected. ASCII whitespace is stripped from Hex and
//! Base64 input first so line-wrapped text is accepted.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::engine::GeneralPurpose;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config;
use crate::enums::Encoding;
use crate::error::CipherError;

pub type Result<T> = std::result::Result<T, CipherError>;

/// Output formatting knobs for the textual encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeOptions {
    /// Emit trailing `=` for Base64 and Base64url
    pub base64_padding: bool,
    pub hex_uppercase: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        let output = &config::load().output;
        EncodeOptions {
            base64_padding: output.base64_padding,
            hex_uppercase: output.hex_uppercase,
        }
    }
}

/// Result of rendering bytes in a requested encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Text(String),
    /// Requested UTF-8, but the bytes are not clean text. Carries the
    /// lossy rendering for display only.
    LossyText(String),
    /// `Encoding::Binary`: the bytes themselves are the output
    Binary,
}

/// Parse text in the given encoding into bytes
pub fn decode(text: &str, encoding: Encoding) -> Result<Vec<u8>> {
    match encoding {
        Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
        Encoding::Base64 => decode_base64(text, &STANDARD, &STANDARD_NO_PAD)
            .map_err(|e| CipherError::encoding(encoding, e)),
        Encoding::Base64Url => decode_base64(text, &URL_SAFE, &URL_SAFE_NO_PAD)
            .map_err(|e| CipherError::encoding(encoding, e)),
        Encoding::Hex => hex::decode(strip_whitespace(text))
            .map_err(|e| CipherError::encoding(encoding, e)),
        Encoding::Binary => Err(CipherError::encoding(
            encoding,
            "binary input has no textual form; supply the bytes directly",
        )),
    }
}

/// Decode caller-supplied input bytes: raw for `Binary`, otherwise the
/// bytes must be UTF-8 text in the given encoding
pub fn decode_input(input: &[u8], encoding: Encoding) -> Result<Vec<u8>> {
    if encoding == Encoding::Binary {
        return Ok(input.to_vec());
    }
    let text = std::str::from_utf8(input)
        .map_err(|e| CipherError::encoding(encoding, format!("input is not text: {e}")))?;
    decode(text, encoding)
}

/// Render bytes in the given encoding
pub fn encode(bytes: &[u8], encoding: Encoding, options: &EncodeOptions) -> Rendered {
    match encoding {
        Encoding::Utf8 => {
            let text = String::from_utf8_lossy(bytes).into_owned();
            if text.contains(char::REPLACEMENT_CHARACTER) {
                Rendered::LossyText(text)
            } else {
                Rendered::Text(text)
            }
        }
        Encoding::Base64 if options.base64_padding => Rendered::Text(STANDARD.encode(bytes)),
        Encoding::Base64 => Rendered::Text(STANDARD_NO_PAD.encode(bytes)),
        Encoding::Base64Url if options.base64_padding => Rendered::Text(URL_SAFE.encode(bytes)),
        Encoding::Base64Url => Rendered::Text(URL_SAFE_NO_PAD.encode(bytes)),
        Encoding::Hex if options.hex_uppercase => Rendered::Text(hex::encode_upper(bytes)),
        Encoding::Hex => Rendered::Text(hex::encode(bytes)),
        Encoding::Binary => Rendered::Binary,
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

// Padding is optional, but when present it must be canonical
fn decode_base64(
    text: &str,
    padded: &GeneralPurpose,
    unpadded: &GeneralPurpose,
) -> std::result::Result<Vec<u8>, base64::DecodeError> {
    let text = strip_whitespace(text);
    if text.contains('=') {
        padded.decode(text)
    } else {
        unpadded.decode(text)
    }
}
