//! Viewer configuration
//!
//! `ViewerConfig` holds the runtime-tunable values. The constants below stay
//! as defaults when a field is missing from the TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::interaction::MIN_LASSO_DIST_PX;
use crate::store::InputMode;

/// How the lasso mask is written to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskTransport {
    /// Raw packed bytes
    #[default]
    Raw,
    /// Base64 text, for stores that cannot carry binary values
    Base64,
}

/// Store key names shared by both sides of the boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreKeys {
    pub positions: String,
    pub coded_values: String,
    pub labels: String,
    pub colors: String,
    pub missing_color: String,
    pub lasso_mask: String,
    pub lasso_request: String,
    pub lasso_result: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            positions: "xyz_bytes_t".to_string(),
            coded_values: "coded_values_t".to_string(),
            labels: "labels_t".to_string(),
            colors: "colors_t".to_string(),
            missing_color: "missing_color_t".to_string(),
            lasso_mask: "lasso_mask_t".to_string(),
            lasso_request: "lasso_request_t".to_string(),
            lasso_result: "lasso_result_t".to_string(),
        }
    }
}

fn default_min_lasso_spacing_px() -> f32 {
    MIN_LASSO_DIST_PX
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Minimum pointer travel (pixels) between recorded lasso points
    #[serde(default = "default_min_lasso_spacing_px")]
    pub min_lasso_spacing_px: f32,
    #[serde(default)]
    pub input_mode: InputMode,
    #[serde(default)]
    pub mask_transport: MaskTransport,
    #[serde(default)]
    pub keys: StoreKeys,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            min_lasso_spacing_px: MIN_LASSO_DIST_PX,
            input_mode: InputMode::default(),
            mask_transport: MaskTransport::default(),
            keys: StoreKeys::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        if !config.min_lasso_spacing_px.is_finite() || config.min_lasso_spacing_px < 0.0 {
            anyhow::bail!("min_lasso_spacing_px must be a non-negative number, got {}", config.min_lasso_spacing_px);
        }
        Ok(config)
    }

    /// Loads the config from a TOML file. Falls back to defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config file {}, using defaults: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = ViewerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.keys.lasso_request, "lasso_request_t");
        assert_eq!(config.min_lasso_spacing_px, 2.0);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = ViewerConfig::from_toml_str(
            r#"
            min_lasso_spacing_px = 4.5
            input_mode = "permissive"
            mask_transport = "base64"

            [keys]
            lasso_mask = "mask"
            "#,
        )
        .unwrap();
        assert_eq!(config.min_lasso_spacing_px, 4.5);
        assert_eq!(config.input_mode, InputMode::Permissive);
        assert_eq!(config.mask_transport, MaskTransport::Base64);
        assert_eq!(config.keys.lasso_mask, "mask");
        assert_eq!(config.keys.coded_values, "coded_values_t");
    }

    #[test]
    fn test_rejects_negative_spacing() {
        assert!(ViewerConfig::from_toml_str("min_lasso_spacing_px = -1.0").is_err());
        assert!(ViewerConfig::from_toml_str("input_mode = \"loose\"").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = ViewerConfig::load_or_default(Path::new("/nonexistent/scatter_lasso.toml"));
        assert_eq!(config, ViewerConfig::default());
    }
}
