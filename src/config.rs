//! Layered configuration: defaults, optional TOML file, `AICP_*` environment

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "aicp.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ChartsConfig {
    pub width: u32,
    pub height: u32,
    pub output_dir: PathBuf,
    /// `light` or `dark`
    pub theme: String,
    /// `svg` or `png`
    pub format: String,
    /// TrueType font for PNG text
    #[serde(default)]
    pub font: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
    /// JSON file of known subjects used to resolve scans offline
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Event location code to display label
    #[serde(default = "default_locations")]
    pub locations: HashMap<String, String>,
}

fn default_locations() -> HashMap<String, String> {
    [
        ("domicilio", "Domicilio"),
        ("casa_club", "Casa club"),
        ("lago", "Lago"),
        ("kiosco", "Kiosco"),
    ]
    .into_iter()
    .map(|(code, label)| (code.to_string(), label.to_string()))
    .collect()
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub charts: ChartsConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// An explicit `path` must exist; otherwise `aicp.toml` is read when
    /// present. Environment variables such as `AICP_CHARTS__WIDTH=800`
    /// override both.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Self::builder()?
            .add_source(file)
            .add_source(
                Environment::with_prefix("AICP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?
            .set_default("charts.width", i64::from(defaults.charts.width))?
            .set_default("charts.height", i64::from(defaults.charts.height))?
            .set_default(
                "charts.output_dir",
                defaults.charts.output_dir.to_string_lossy().into_owned(),
            )?
            .set_default("charts.theme", defaults.charts.theme)?
            .set_default("charts.format", defaults.charts.format)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            output_dir: PathBuf::from("output/charts"),
            theme: "light".to_string(),
            format: "svg".to_string(),
            font: None,
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            directory: None,
            locations: default_locations(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            charts: ChartsConfig::default(),
            scanner: ScannerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::defaults().unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.charts.width, 600);
        assert!(config.scanner.directory.is_none());
        assert_eq!(
            config.scanner.locations.get("casa_club").map(String::as_str),
            Some("Casa club")
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[charts]\nwidth = 800\ntheme = \"dark\"\n\n[scanner]\ndirectory = \"visitors.json\""
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.charts.width, 800);
        assert_eq!(config.charts.height, 400);
        assert_eq!(config.charts.theme, "dark");
        assert_eq!(config.charts.format, "svg");
        assert!(config.charts.font.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.scanner.directory.as_deref(),
            Some(Path::new("visitors.json"))
        );
        assert_eq!(config.scanner.locations.len(), 4);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        assert!(AppConfig::load(Some(Path::new("/nonexistent/aicp.toml"))).is_err());
    }
}
