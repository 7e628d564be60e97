// src/bin/cipher_batch.rs
//! Batch runner: TOML job files in, one JSON report out
//!
//! Usage: `cipher_batch <jobs.toml>...`
//!
//! Each `[[job]]` describes one request. Byte fields are hex. A job with
//! `random_iv = true` gets a fresh IV/nonce, reported back so the result
//! can be decrypted later.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use cipher_engine::{
    generate_iv, process, CipherRequest, CipherResult, CipherSpec, Direction, Encoding, KdfSpec,
    KeyMaterial, KeyRole, PaddingScheme,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct JobFile {
    #[serde(default, rename = "job")]
    jobs: Vec<Job>,
}

#[derive(Debug, Deserialize)]
struct Job {
    name: String,
    direction: Direction,
    cipher: CipherSpec,
    padding: Option<PaddingScheme>,
    key_hex: String,
    #[serde(default = "default_key_role")]
    key_role: KeyRole,
    #[serde(default)]
    kdf: KdfSpec,
    #[serde(default)]
    salt_hex: String,
    iv_hex: Option<String>,
    #[serde(default)]
    random_iv: bool,
    counter: Option<u64>,
    input: String,
    #[serde(default = "default_input_encoding")]
    input_encoding: Encoding,
    #[serde(default = "default_output_encoding")]
    output_encoding: Encoding,
}

fn default_key_role() -> KeyRole {
    KeyRole::Raw
}

fn default_input_encoding() -> Encoding {
    Encoding::Utf8
}

fn default_output_encoding() -> Encoding {
    Encoding::Hex
}

#[derive(Debug, Serialize)]
struct JobReport {
    file: String,
    name: String,
    cipher: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    iv_hex: Option<String>,
    #[serde(flatten)]
    outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Outcome {
    Ok { result: CipherResult },
    Error { kind: String, message: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        bail!("usage: cipher_batch <jobs.toml>...");
    }

    let mut reports = Vec::new();
    let mut failed = 0usize;

    for path in &paths {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read job file {}", path.display()))?;
        let file: JobFile = toml::from_str(&content)
            .with_context(|| format!("Invalid job file {}", path.display()))?;

        info!(file = %path.display(), jobs = file.jobs.len(), "loaded job file");

        for job in file.jobs {
            let report = run_job(&path.display().to_string(), job)?;
            if matches!(report.outcome, Outcome::Error { .. }) {
                failed += 1;
            }
            reports.push(report);
        }
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    info!(total = reports.len(), failed, "batch complete");

    Ok(())
}

/// Malformed hex in the job itself aborts the batch; cipher errors are
/// reported per job
fn run_job(file: &str, job: Job) -> Result<JobReport> {
    let key = hex::decode(job.key_hex.trim())
        .with_context(|| format!("job '{}': key_hex is not hex", job.name))?;
    let key = match job.key_role {
        KeyRole::Raw => KeyMaterial::raw(key),
        KeyRole::KdfInput => KeyMaterial::passphrase(key),
    };
    let salt = hex::decode(job.salt_hex.trim())
        .with_context(|| format!("job '{}': salt_hex is not hex", job.name))?;

    let iv = match (&job.iv_hex, job.random_iv) {
        (Some(_), true) => bail!("job '{}': set iv_hex or random_iv, not both", job.name),
        (Some(iv_hex), false) => Some(
            hex::decode(iv_hex.trim())
                .with_context(|| format!("job '{}': iv_hex is not hex", job.name))?,
        ),
        (None, true) => generate_iv(&job.cipher)?,
        (None, false) => None,
    };

    let mut request = CipherRequest::new(job.direction, job.cipher, key)
        .with_kdf(job.kdf, salt)
        .with_text_input(&job.input, job.input_encoding)
        .with_output(job.output_encoding);
    if let Some(padding) = job.padding {
        request = request.with_padding(padding);
    }
    if let Some(iv) = iv.clone() {
        request = request.with_iv(iv);
    }
    if let Some(counter) = job.counter {
        request = request.with_counter(counter);
    }

    let outcome = match process(&request) {
        Ok(result) => Outcome::Ok { result },
        Err(e) => {
            warn!(job = %job.name, kind = e.kind(), "job failed");
            Outcome::Error {
                kind: e.kind().to_string(),
                message: e.to_string(),
            }
        }
    };

    Ok(JobReport {
        file: file.to_string(),
        name: job.name,
        cipher: job.cipher.to_string(),
        iv_hex: job.random_iv.then(|| iv.as_deref().map(hex::encode)).flatten(),
        outcome,
    })
}
