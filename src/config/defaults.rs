// src/config/defaults.rs
use crate::config::app::{BlockDefaults, KdfDefaults, OutputDefaults};
use crate::consts::{DEFAULT_PBKDF2_ITERATIONS, DEFAULT_SALT_LEN, GCM_NONCE_LEN};
use crate::enums::{HashAlgorithm, PaddingScheme};

pub fn default_kdf() -> KdfDefaults {
    KdfDefaults {
        pbkdf2_iterations: DEFAULT_PBKDF2_ITERATIONS,
        hash: HashAlgorithm::Sha256,
        salt_len: DEFAULT_SALT_LEN,
    }
}

pub fn default_output() -> OutputDefaults {
    OutputDefaults {
        base64_padding: true,
        hex_uppercase: false,
    }
}

pub fn default_block() -> BlockDefaults {
    BlockDefaults {
        default_padding: PaddingScheme::Pkcs7,
        gcm_iv_len: GCM_NONCE_LEN,
    }
}
