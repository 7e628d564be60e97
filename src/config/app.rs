// src/config/app.rs
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::warn;

use super::defaults::*;
use crate::consts::{CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH};
use crate::enums::{HashAlgorithm, PaddingScheme};
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_kdf")]
    pub kdf: KdfDefaults,
    #[serde(default = "default_output")]
    pub output: OutputDefaults,
    #[serde(default = "default_block")]
    pub block: BlockDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KdfDefaults {
    pub pbkdf2_iterations: u32,
    pub hash: HashAlgorithm,
    pub salt_len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputDefaults {
    pub base64_padding: bool,
    pub hex_uppercase: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockDefaults {
    pub default_padding: PaddingScheme,
    pub gcm_iv_len: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            kdf: default_kdf(),
            output: default_output(),
            block: default_block(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Load config once, falling back to built-in defaults if missing or invalid
pub fn load() -> &'static EngineConfig {
    CONFIG.get_or_init(|| {
        let config_path =
            std::env::var(CONFIG_ENV_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        if !Path::new(&config_path).exists() {
            warn!(path = %config_path, "engine config not found, using built-in defaults");
            return EngineConfig::default();
        }

        match EngineConfig::from_file(&config_path) {
            Ok(conf) => conf,
            Err(e) => {
                warn!(
                    path = %config_path,
                    error = %e,
                    "engine config unreadable, using built-in defaults"
                );
                EngineConfig::default()
            }
        }
    })
}
