//! User configuration (`config.toml`)
//!
//! Holds the static reference rates (CDI, IPCA) used when a position doesn't
//! carry its own, the default variable-income tax rate and an optional data
//! file location. A missing file means defaults.

use anyhow::{anyhow, Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::CarteiraError;
use crate::tax::SWING_TRADE_RATE;
use crate::valuation::coerce::to_number;

const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable overriding the data file location
pub const DATA_FILE_ENV: &str = "CARTEIRA_FILE";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    data_file: Option<PathBuf>,
    rates: RawRates,
    tax: RawTax,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawRates {
    cdi: Option<String>,
    ipca: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawTax {
    manual_rate: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: Option<PathBuf>,
    /// CDI % a.a. used when a position has none
    pub cdi: Option<Decimal>,
    /// IPCA % a.a. used when a position has none
    pub ipca: Option<Decimal>,
    /// Rate for variable-income gains, in percent
    pub manual_tax_rate: Decimal,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            cdi: None,
            ipca: None,
            manual_tax_rate: SWING_TRADE_RATE,
        }
    }
}

impl Config {
    /// Parse a TOML document. Rates accept Brazilian notation ("10,65").
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| CarteiraError::Config(e.to_string()))
            .context("Failed to parse config.toml")?;

        let manual_tax_rate = match raw.tax.manual_rate.as_deref() {
            Some(rate) => to_number(rate),
            None => SWING_TRADE_RATE,
        };

        Ok(Self {
            data_file: raw.data_file,
            cdi: raw.rates.cdi.as_deref().map(to_number),
            ipca: raw.rates.ipca.as_deref().map(to_number),
            manual_tax_rate,
        })
    }

    /// Load from `path`, or defaults when the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {:?}", path))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    /// Data file to use: explicit flag, then `CARTEIRA_FILE`, then config, then default.
    pub fn resolve_data_file(&self, explicit: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path);
        }
        if let Some(path) = std::env::var_os(DATA_FILE_ENV) {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = &self.data_file {
            return Ok(path.clone());
        }
        crate::store::get_default_store_path()
    }
}

/// `$XDG_CONFIG_HOME/carteira/config.toml`, falling back to the platform config dir
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dir_spec::config_home)
        .ok_or_else(|| anyhow!("Could not determine config directory"))?;
    Ok(config_dir.join("carteira").join(CONFIG_FILENAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = Config::from_toml_str(
            r#"
data_file = "/tmp/carteira.json"

[rates]
cdi = "10,65"
ipca = "4.5"

[tax]
manual_rate = "20"
"#,
        )
        .unwrap();

        assert_eq!(config.data_file, Some(PathBuf::from("/tmp/carteira.json")));
        assert_eq!(config.cdi, Some(dec!(10.65)));
        assert_eq!(config.ipca, Some(dec!(4.5)));
        assert_eq!(config.manual_tax_rate, dec!(20));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.manual_tax_rate, dec!(15));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let err = Config::from_toml_str("[rates\ncdi = ").unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[rates]\ncdi = \"13,75\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.cdi, Some(dec!(13.75)));
        assert_eq!(config.ipca, None);
    }

    #[test]
    fn test_explicit_data_file_wins() {
        let config = Config {
            data_file: Some(PathBuf::from("/from/config.json")),
            ..Config::default()
        };
        let resolved = config
            .resolve_data_file(Some(PathBuf::from("/from/flag.json")))
            .unwrap();
        assert_eq!(resolved, PathBuf::from("/from/flag.json"));
    }
}
