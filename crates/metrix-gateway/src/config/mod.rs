//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use metrix_core::error::{MetrixError, Result};

pub use schema::{GatewaySection, MetrixConfig, RegistrySection};

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "metrix.yaml";

pub fn load_from_file(path: &str) -> Result<MetrixConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetrixError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<MetrixConfig> {
    let cfg: MetrixConfig = serde_yaml::from_str(s)
        .map_err(|e| MetrixError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// `path` if given, else `metrix.yaml` if present, else built-in defaults.
pub fn load(path: Option<&str>) -> Result<MetrixConfig> {
    match path {
        Some(p) => load_from_file(p),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH),
        None => {
            tracing::info!("no {DEFAULT_CONFIG_PATH} found, using defaults");
            Ok(MetrixConfig::default())
        }
    }
}
