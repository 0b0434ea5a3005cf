use serde::Deserialize;
use std::{fs, path::Path};
use anyhow::{Context, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub search: Search,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Search {
    /// Fixed part of the hashed message; the nonce is appended to it.
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_difficulty_bits")]
    pub difficulty_bits: u32,
    #[serde(default)]
    pub workers: usize,                  // 0 = one per hardware thread
    #[serde(default = "default_report_interval_secs")]
    pub report_interval_secs: u64,
    #[serde(default)]
    pub max_attempts: u64,               // 0 = unlimited
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_difficulty_bits() -> u32 { 22 }
fn default_report_interval_secs() -> u64 { 2 }

/// Read the TOML file at `p` and deserialize into `Config`.
/// *Adds context* so user errors print a friendlier message.
///
/// # Errors
/// * Returns an anyhow::Error if the file cannot be read or parsed.
pub fn load<P: AsRef<Path>>(p: P) -> Result<Config> {
    let text = fs::read_to_string(&p)
        .with_context(|| format!("🗂️  couldn’t read config file {}", p.as_ref().display()))?;
    load_from_str(&text)
}

/// Deserialize `Config` from a TOML string (used for the embedded default).
pub fn load_from_str(text: &str) -> Result<Config> {
    toml::from_str(text).with_context(|| "📝  invalid TOML in config file".to_string())
}
