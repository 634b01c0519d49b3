use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::pipeline::processing::color::{ColorMapping, ColorResolver};
use crate::pipeline::processing::processors::PipelineSettings;
use crate::pipeline::processing::transform::DatePrecision;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "RETAIL_REPORTS_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dates: DatesConfig,
    pub ecommerce: EcommerceConfig,
    pub colors: ColorsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatesConfig {
    pub precision: DatePrecision,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EcommerceConfig {
    pub dedupe_invoice_items: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    /// JSON object of color code to description, relative to the config file
    pub mapping_file: Option<PathBuf>,
    /// Inline entries; these win over the mapping file
    pub mapping: HashMap<String, String>,
}

impl Config {
    /// Load from `path`, or defaults when the file does not exist.
    ///
    /// A relative `colors.mapping_file` is resolved against the directory
    /// holding the config file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&content)?;

        if let Some(mapping_file) = config.colors.mapping_file.take() {
            let resolved = match path.parent() {
                Some(dir) if mapping_file.is_relative() => dir.join(mapping_file),
                _ => mapping_file,
            };
            config.colors.mapping_file = Some(resolved);
        }

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Config path from the environment, falling back to `config.toml`
    pub fn default_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Fixed color mapping: file entries first, inline entries on top
    pub fn color_mapping(&self) -> Result<ColorMapping> {
        let from_file = match &self.colors.mapping_file {
            Some(path) => ColorMapping::from_json_file(path)?,
            None => ColorMapping::default(),
        };
        Ok(from_file.merged_with(ColorMapping::new(self.colors.mapping.clone())))
    }

    /// Immutable settings handed to every processor for one run
    pub fn pipeline_settings(&self) -> Result<PipelineSettings> {
        let mapping = self.color_mapping()?;
        if mapping.is_empty() {
            debug!("No fixed color mapping configured, using database colors only");
        } else {
            debug!(colors = mapping.len(), "Built fixed color mapping");
        }
        Ok(PipelineSettings {
            date_precision: self.dates.precision,
            dedupe_ecommerce_items: self.ecommerce.dedupe_invoice_items,
            color_resolver: ColorResolver::new(mapping),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.dates.precision, DatePrecision::Day);
        assert!(!config.ecommerce.dedupe_invoice_items);
        assert!(config.colors.mapping.is_empty());
        assert!(config.color_mapping().unwrap().is_empty());
    }

    #[test]
    fn test_parse_all_sections() {
        let config = Config::from_toml_str(
            r#"
            [dates]
            precision = "instant"

            [ecommerce]
            dedupe_invoice_items = true

            [colors.mapping]
            "01" = "preto"
            "#,
        )
        .unwrap();

        let settings = config.pipeline_settings().unwrap();
        assert_eq!(settings.date_precision, DatePrecision::Instant);
        assert!(settings.dedupe_ecommerce_items);
        assert_eq!(settings.color_resolver.resolve(Some("01"), Some("BLACK")), "PRETO");
    }

    #[test]
    fn test_unknown_precision_is_rejected() {
        let err = Config::from_toml_str("[dates]\nprecision = \"hour\"").unwrap_err();
        assert!(matches!(err, PipelineError::Toml(_)));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.dates.precision, DatePrecision::Day);
    }

    #[test]
    fn test_mapping_file_relative_to_config_and_inline_wins() {
        let dir = TempDir::new().unwrap();
        let mut mapping = fs::File::create(dir.path().join("colors.json")).unwrap();
        write!(mapping, r#"{{"01": "PRETO", "02": "AZUL"}}"#).unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[colors]\nmapping_file = \"colors.json\"\n[colors.mapping]\n\"02\" = \"AZUL MARINHO\"\n",
        )
        .unwrap();

        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        let mapping = config.color_mapping().unwrap();

        assert_eq!(mapping.get("01"), Some("PRETO"));
        assert_eq!(mapping.get("02"), Some("AZUL MARINHO"));
    }

    #[test]
    fn test_bad_mapping_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("colors.json"), "[1, 2]").unwrap();
        fs::write(dir.path().join("config.toml"), "[colors]\nmapping_file = \"colors.json\"\n").unwrap();

        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert!(matches!(config.pipeline_settings(), Err(PipelineError::Config(_))));
    }
}
