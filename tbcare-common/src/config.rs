//! Configuration loading and artifact path resolution
//!
//! Resolution priority for the configuration file:
//! 1. Explicit path (highest priority)
//! 2. `TBCARE_CONFIG` environment variable
//! 3. Platform config directory (`<config dir>/tbcare/tbcare.toml`)
//! 4. Compiled defaults (fallback)
//!
//! Individual artifact paths may additionally be overridden with the
//! `TBCARE_MODEL_PATH` and `TBCARE_SCALER_PATH` environment variables.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Engine configuration: where the trained artifacts live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Path to the exported multimodal classifier (ONNX)
    pub model_path: PathBuf,
    /// Path to the fitted age scaler export (JSON)
    pub scaler_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("tb_multimodal.onnx"),
            scaler_path: PathBuf::from("age_scaler.json"),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read config failed ({}): {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse config failed ({}): {}", path.display(), e)))
    }

    /// Resolve configuration following the priority order
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit {
            info!(path = %path.display(), "Loading config from explicit path");
            Self::from_toml_file(path)?
        } else if let Ok(path) = std::env::var("TBCARE_CONFIG") {
            info!(path = %path, "Loading config from TBCARE_CONFIG");
            Self::from_toml_file(Path::new(&path))?
        } else {
            match default_config_path() {
                Some(path) if path.exists() => {
                    info!(path = %path.display(), "Loading config from default location");
                    Self::from_toml_file(&path)?
                }
                _ => {
                    warn!("No config file found, using compiled defaults");
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply per-artifact environment overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("TBCARE_MODEL_PATH") {
            info!(path = %path, "Model path overridden from environment");
            self.model_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("TBCARE_SCALER_PATH") {
            info!(path = %path, "Scaler path overridden from environment");
            self.scaler_path = PathBuf::from(path);
        }
    }
}

/// Default configuration file location for the platform
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tbcare").join("tbcare.toml"))
}
