// src/config/mod.rs
//! Configuration system for cipher-engine
//!
//! Central, lazy-loaded global config with TOML + env override. Only
//! defaults live here; a built request never consults it again.

pub use app::{load, BlockDefaults, EngineConfig, KdfDefaults, OutputDefaults};

mod app;
mod defaults;
