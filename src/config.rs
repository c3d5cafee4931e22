//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.flightboard.toml` files.

use crate::chart::renderer::parse_color;
use crate::chart::{BarChartStyle, OutputFormat};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Operations API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Chart rendering settings.
    #[serde(default)]
    pub render: RenderConfig,
}

/// Operations API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the operations API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory charts and the summary page are written to.
    #[serde(default = "default_out_dir")]
    pub dir: String,

    /// Chart output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Write the Markdown summary page.
    #[serde(default = "default_true")]
    pub summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_out_dir(),
            format: OutputFormat::default(),
            summary: true,
        }
    }
}

fn default_out_dir() -> String {
    "dashboard".to_string()
}

fn default_true() -> bool {
    true
}

/// Chart rendering settings.
///
/// Defaults are the dashboard's house style: translucent teal bars with a
/// solid teal outline and a single series labeled "Income".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Chart width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Chart height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Label of the single data series.
    #[serde(default = "default_series_label")]
    pub series_label: String,

    /// Bar fill color (#rrggbb).
    #[serde(default = "default_fill")]
    pub fill: String,

    /// Bar fill opacity (0.0 - 1.0).
    #[serde(default = "default_fill_alpha")]
    pub fill_alpha: f64,

    /// Bar outline color (#rrggbb).
    #[serde(default = "default_stroke")]
    pub stroke: String,

    /// Bar outline width in pixels.
    #[serde(default = "default_border_width")]
    pub border_width: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            series_label: default_series_label(),
            fill: default_fill(),
            fill_alpha: default_fill_alpha(),
            stroke: default_stroke(),
            border_width: default_border_width(),
        }
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_series_label() -> String {
    "Income".to_string()
}

fn default_fill() -> String {
    "#4bc0c0".to_string()
}

fn default_fill_alpha() -> f64 {
    0.2
}

fn default_stroke() -> String {
    "#4bc0c0".to_string()
}

fn default_border_width() -> u32 {
    1
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".flightboard.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }

        if let Some(ref dir) = args.out_dir {
            self.output.dir = dir.to_string_lossy().into_owned();
        }
        if let Some(format) = args.format {
            self.output.format = format;
        }
        if args.no_summary {
            self.output.summary = false;
        }

        if let Some(width) = args.width {
            self.render.width = width;
        }
        if let Some(height) = args.height {
            self.render.height = height;
        }
    }

    /// Validate the merged configuration.
    ///
    /// Values from the config file skip CLI argument validation, so the
    /// merged result gets the same range checks before the run starts.
    pub fn validate(&self) -> Result<(), String> {
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err("API URL must start with 'http://' or 'https://'".to_string());
        }

        if self.api.timeout_seconds == 0 {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if self.render.width == 0 {
            return Err("Chart width must be at least 1 pixel".to_string());
        }
        if self.render.height == 0 {
            return Err("Chart height must be at least 1 pixel".to_string());
        }

        Ok(())
    }

    /// Build the renderer style from the `[render]` and `[output]` settings.
    pub fn chart_style(&self) -> Result<BarChartStyle> {
        if !(0.0..=1.0).contains(&self.render.fill_alpha) {
            anyhow::bail!(
                "Fill alpha must be between 0.0 and 1.0 (got {})",
                self.render.fill_alpha
            );
        }

        let fill = parse_color(&self.render.fill).with_context(|| {
            format!("Invalid fill color '{}' (expected #rrggbb)", self.render.fill)
        })?;
        let stroke = parse_color(&self.render.stroke).with_context(|| {
            format!(
                "Invalid stroke color '{}' (expected #rrggbb)",
                self.render.stroke
            )
        })?;

        Ok(BarChartStyle {
            series_label: self.render.series_label.clone(),
            fill,
            fill_alpha: self.render.fill_alpha,
            stroke,
            border_width: self.render.border_width,
            width: self.render.width,
            height: self.render.height,
            format: self.output.format,
        })
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use plotters::style::RGBColor;
    use std::path::PathBuf;

    fn make_args() -> Args {
        Args {
            api_url: None,
            out_dir: None,
            format: None,
            width: None,
            height: None,
            timeout: None,
            config: None,
            no_summary: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.output.dir, "dashboard");
        assert_eq!(config.output.format, OutputFormat::Png);
        assert!(config.output.summary);
        assert_eq!(config.render.width, 800);
        assert_eq!(config.render.height, 600);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[api]
base_url = "http://ops.example.com"
timeout_seconds = 10

[output]
dir = "charts"
format = "svg"

[render]
width = 1024
series_label = "Revenue"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.api.base_url, "http://ops.example.com");
        assert_eq!(config.api.timeout_seconds, 10);
        assert_eq!(config.output.dir, "charts");
        assert_eq!(config.output.format, OutputFormat::Svg);
        assert_eq!(config.render.width, 1024);
        assert_eq!(config.render.height, 600);
        assert_eq!(config.render.series_label, "Revenue");
    }

    #[test]
    fn test_merge_with_args_overrides_explicit_values() {
        let mut config = Config::default();
        let mut args = make_args();
        args.api_url = Some("http://ops.example.com".to_string());
        args.timeout = Some(5);
        args.out_dir = Some(PathBuf::from("charts"));
        args.format = Some(OutputFormat::Svg);
        args.no_summary = true;
        args.width = Some(400);

        config.merge_with_args(&args);

        assert_eq!(config.api.base_url, "http://ops.example.com");
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(config.output.dir, "charts");
        assert_eq!(config.output.format, OutputFormat::Svg);
        assert!(!config.output.summary);
        assert_eq!(config.render.width, 400);
        // Height was not provided, config default stays
        assert_eq!(config.render.height, 600);
    }

    #[test]
    fn test_merge_with_args_keeps_config_when_absent() {
        let mut config = Config::default();
        config.api.base_url = "http://ops.example.com".to_string();

        config.merge_with_args(&make_args());

        assert_eq!(config.api.base_url, "http://ops.example.com");
        assert!(config.output.summary);
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_dimensions() {
        let mut config = Config::default();
        config.render.width = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.render.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_url_scheme() {
        let mut config = Config::default();
        config.api.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_chart_style_from_defaults() {
        let style = Config::default().chart_style().unwrap();
        assert_eq!(style.series_label, "Income");
        assert_eq!(style.fill, RGBColor(75, 192, 192));
        assert_eq!(style.stroke, RGBColor(75, 192, 192));
        assert_eq!(style.fill_alpha, 0.2);
        assert_eq!(style.format, OutputFormat::Png);
    }

    #[test]
    fn test_chart_style_rejects_bad_color() {
        let mut config = Config::default();
        config.render.fill = "teal-ish".to_string();
        assert!(config.chart_style().is_err());
    }

    #[test]
    fn test_chart_style_rejects_bad_alpha() {
        let mut config = Config::default();
        config.render.fill_alpha = 1.5;
        assert!(config.chart_style().is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[render]"));
        assert!(toml_str.contains("base_url"));
    }
}
