//! Configuration module for the rating classifier service.
//!
//! Settings come from environment variables, organized by concern: where the
//! model lives and where the HTTP listener binds.

mod model_config;
mod server_config;

pub use model_config::{DEFAULT_METADATA_PATH, DEFAULT_MODEL_PATH, ModelEnvConfig};
pub use server_config::ServerEnvConfig;

use anyhow::{Context, Result};
use std::env;

/// Main application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub model: ModelEnvConfig,
    pub server: ServerEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let model = ModelEnvConfig::from_lookup(&lookup);
        let server = ServerEnvConfig::from_lookup(&lookup).context("Failed to load server config")?;
        Ok(Self { model, server })
    }
}
