// SPDX-License-Identifier: Apache-2.0

//! Optional TOML configuration, e.g.:
//!
//! ```toml
//! [genlib]
//! always_use = ["BUF.*", "TIE(HI|LO)"]
//!
//! [genlib.pin]
//! max_load = 500.0
//! ```
//!
//! Command-line `--always-use` lists are added to the configured ones.

use anyhow::{Context, Result};
use lib2genlib::genlib::PinParams;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    #[serde(default)]
    pub genlib: GenlibConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenlibConfig {
    /// Regex patterns (or comma-separated pattern lists) for cells that are
    /// emitted even when the library marks them `dont_use`.
    #[serde(default)]
    pub always_use: Vec<String>,

    /// Placeholder values for the Genlib `PIN` line.
    #[serde(default)]
    pub pin: PinParams,
}

impl DriverConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing configuration TOML")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("loading configuration {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = DriverConfig::from_toml_str("").unwrap();
        assert!(cfg.genlib.always_use.is_empty());
        assert_eq!(cfg.genlib.pin, PinParams::default());
    }

    #[test]
    fn test_full_config() {
        let cfg = DriverConfig::from_toml_str(
            r#"
            [genlib]
            always_use = ["BUF.*", "INV_X1,INV_X2"]

            [genlib.pin]
            input_load = 2.0
            max_load = 500.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.genlib.always_use, vec!["BUF.*", "INV_X1,INV_X2"]);
        assert_eq!(cfg.genlib.pin.input_load, 2.0);
        assert_eq!(cfg.genlib.pin.max_load, 500.0);
        assert_eq!(cfg.genlib.pin.rise_fanout_delay, 0.2);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(DriverConfig::from_toml_str("[genlib]\nalways_usee = []\n").is_err());
        assert!(DriverConfig::from_toml_str("[genlib.pin]\nmax_lod = 1.0\n").is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = DriverConfig::from_path(Path::new("/no/such/lib2genlib.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("reading configuration"));
    }
}
