//! Model artifact locations.

use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "models/best_model.json";
pub const DEFAULT_METADATA_PATH: &str = "models/best_model_metadata.json";

/// Model environment configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ModelEnvConfig {
    pub model_path: PathBuf,
    pub metadata_path: PathBuf,
}

impl Default for ModelEnvConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            metadata_path: PathBuf::from(DEFAULT_METADATA_PATH),
        }
    }
}

impl ModelEnvConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            model_path: lookup("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            metadata_path: lookup("METADATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_METADATA_PATH)),
        }
    }
}
