// GUI configuration module
pub mod theme;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming a JSON file that replaces the embedded default.
pub const CONFIG_ENV_VAR: &str = "CANDLE_VIEWER_CONFIG";

const DEFAULT_CONFIG: &str = include_str!("../../assets/config/default.json");

/// Mirrors `assets/config/default.json`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub version: String,
    pub app: AppSettings,
    pub backend: BackendSettings,
    pub chart: ChartConfig,
    pub behavior: BehaviorSettings,
    pub format: FormatSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: String, // "candlestick"
    pub background: String,
    pub text_color: String,
    pub grid_color: String,
    pub candle: CandleStyle,
    pub volume: VolumeStyle,
    pub vwap: LineStyle,
    pub ema: LineStyle,
    pub crosshair: CrosshairStyle,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CandleStyle {
    pub bullish_color: String,
    pub bearish_color: String,
    pub wick_width: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct VolumeStyle {
    pub color: String,
    pub title: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub line_width: u32,
    pub title: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CrosshairStyle {
    pub color: String,
}

/// What the legend does when the pointer leaves the data area.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LegendPolicy {
    #[default]
    Hide,
    Keep,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BehaviorSettings {
    #[serde(default)]
    pub auto_load_first_symbol: bool,
    #[serde(default)]
    pub legend_policy: LegendPolicy,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FormatSettings {
    pub date_time_format: String,
    pub thousand_separator: String,
}

impl AppConfig {
    /// The configuration embedded in the binary.
    pub fn load_default() -> Result<Self> {
        Self::from_json(DEFAULT_CONFIG).context("embedded default configuration is invalid")
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid config file '{}'", path.display()))
    }

    /// Uses the file named by `CANDLE_VIEWER_CONFIG` when set, otherwise the
    /// embedded default.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => {
                tracing::info!(path = ?path, "Loading configuration from {}", CONFIG_ENV_VAR);
                Self::load_from_path(path)
            }
            _ => Self::load_default(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.app.width == 0 || self.app.height == 0 {
            bail!("window size must be non-zero, got {}x{}", self.app.width, self.app.height);
        }
        reqwest::Url::parse(&self.backend.base_url)
            .with_context(|| format!("backend.base_url '{}' is not a valid URL", self.backend.base_url))?;
        if self.backend.timeout_secs == 0 {
            bail!("backend.timeout_secs must be positive");
        }
        if self.format.date_time_format.trim().is_empty() {
            bail!("format.date_time_format must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_default_loads() {
        let config = AppConfig::load_default().unwrap();
        assert_eq!(config.chart.chart_type, "candlestick");
        assert_eq!(config.behavior.legend_policy, LegendPolicy::Hide);
        assert!(config.behavior.auto_load_first_symbol);
        assert_eq!(config.format.thousand_separator, ",");
    }

    #[test]
    fn load_from_path_reads_override() {
        let raw = DEFAULT_CONFIG
            .replace("\"legend_policy\": \"hide\"", "\"legend_policy\": \"keep\"")
            .replace("http://127.0.0.1:8000", "http://10.0.0.5:9000");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(raw.as_bytes()).unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.behavior.legend_policy, LegendPolicy::Keep);
        assert_eq!(config.backend.base_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn load_from_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from_path(dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let raw = DEFAULT_CONFIG.replace("http://127.0.0.1:8000", "not a url");
        assert!(AppConfig::from_json(&raw).is_err());
    }

    #[test]
    fn zero_window_size_is_rejected() {
        let raw = DEFAULT_CONFIG.replace("\"width\": 1280", "\"width\": 0");
        let err = AppConfig::from_json(&raw).unwrap_err();
        assert!(err.to_string().contains("window size"));
    }
}
