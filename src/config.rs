//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! section is optional; anything missing falls back to the built-in
//! defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::types::{DEFAULT_CURRENCY, DEFAULT_NAME_A, DEFAULT_NAME_B};
use crate::validation::ValidationPolicy;

/// Default config file path.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: DefaultsConfig,
    pub validation: ValidationPolicy,
}

/// Values used when the command line leaves them out.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Strategy identifier: "arbitrage" | "kelly" | "proportional"
    pub method: String,
    pub currency: String,
    pub name_a: String,
    pub name_b: String,
    /// Output format: "text" | "json"
    pub output: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            method: "arbitrage".to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            name_a: DEFAULT_NAME_A.to_string(),
            name_b: DEFAULT_NAME_B.to_string(),
            output: "text".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!(path, "No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
