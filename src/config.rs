//! Configuration for an EDA run.
//!
//! Values come from [`EdaConfig::default`], optionally a JSON file, and then
//! explicit overrides set through [`EdaConfig::builder`].

use crate::data::processor::DEFAULT_PLACEHOLDER;
use crate::data::FallbackSource;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for one pass of load, profile, clean and render.
///
/// # Example
///
/// ```rust,ignore
/// let config = EdaConfig::builder()
///     .input_path("data/train.csv")
///     .head_rows(10)
///     .open_chart(false)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdaConfig {
    /// Primary CSV location.
    /// Default: "data/train.csv"
    pub input_path: PathBuf,

    /// Source used when `input_path` does not exist.
    /// Default: the seaborn reference dataset, cached under `data/`
    pub fallback: FallbackSource,

    /// Number of rows shown in the head preview.
    /// Default: 5
    pub head_rows: usize,

    /// Token written into missing cabin/deck cells.
    /// Default: "Unknown"
    pub placeholder: String,

    /// Directory the chart is written to.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// File name of the rendered chart.
    /// Default: "survival_overview.png"
    pub chart_file: String,

    /// Chart size in pixels (width, height).
    /// Default: (1500, 1200)
    pub chart_size: (u32, u32),

    /// Open the chart with the system viewer after rendering.
    /// Default: true
    pub open_chart: bool,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/train.csv"),
            fallback: FallbackSource::default(),
            head_rows: 5,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            output_dir: PathBuf::from("output"),
            chart_file: "survival_overview.png".to_string(),
            chart_size: (1500, 1200),
            open_chart: true,
        }
    }
}

impl EdaConfig {
    pub fn builder() -> EdaConfigBuilder {
        EdaConfigBuilder::default()
    }

    /// Read a (possibly partial) JSON config; missing keys take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.chart_file)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.head_rows == 0 {
            return Err(ConfigError::Invalid("head_rows must be at least 1".into()));
        }
        if self.chart_size.0 == 0 || self.chart_size.1 == 0 {
            return Err(ConfigError::Invalid(format!(
                "chart_size must be non-zero, got {}x{}",
                self.chart_size.0, self.chart_size.1
            )));
        }
        if self.placeholder.trim().is_empty() {
            return Err(ConfigError::Invalid("placeholder must not be empty".into()));
        }
        if self.chart_file.trim().is_empty() {
            return Err(ConfigError::Invalid("chart_file must not be empty".into()));
        }
        Ok(())
    }
}

/// Builder for [`EdaConfig`]. Unset fields keep the base value.
#[derive(Debug, Default)]
pub struct EdaConfigBuilder {
    base: Option<EdaConfig>,
    input_path: Option<PathBuf>,
    fallback: Option<FallbackSource>,
    head_rows: Option<usize>,
    placeholder: Option<String>,
    output_dir: Option<PathBuf>,
    chart_file: Option<String>,
    chart_size: Option<(u32, u32)>,
    open_chart: Option<bool>,
}

impl EdaConfigBuilder {
    /// Start from an existing config (e.g. one read from a file) instead of
    /// the defaults.
    pub fn base(mut self, config: EdaConfig) -> Self {
        self.base = Some(config);
        self
    }

    pub fn input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = Some(path.into());
        self
    }

    pub fn fallback(mut self, fallback: FallbackSource) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn head_rows(mut self, rows: usize) -> Self {
        self.head_rows = Some(rows);
        self
    }

    pub fn placeholder(mut self, token: impl Into<String>) -> Self {
        self.placeholder = Some(token.into());
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn chart_file(mut self, name: impl Into<String>) -> Self {
        self.chart_file = Some(name.into());
        self
    }

    pub fn chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart_size = Some((width, height));
        self
    }

    pub fn open_chart(mut self, open: bool) -> Self {
        self.open_chart = Some(open);
        self
    }

    pub fn build(self) -> Result<EdaConfig, ConfigError> {
        let base = self.base.unwrap_or_default();
        let config = EdaConfig {
            input_path: self.input_path.unwrap_or(base.input_path),
            fallback: self.fallback.unwrap_or(base.fallback),
            head_rows: self.head_rows.unwrap_or(base.head_rows),
            placeholder: self.placeholder.unwrap_or(base.placeholder),
            output_dir: self.output_dir.unwrap_or(base.output_dir),
            chart_file: self.chart_file.unwrap_or(base.chart_file),
            chart_size: self.chart_size.unwrap_or(base.chart_size),
            open_chart: self.open_chart.unwrap_or(base.open_chart),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_builder_defaults() {
        let config = EdaConfig::builder().build().unwrap();
        assert_eq!(config, EdaConfig::default());
        assert_eq!(config.chart_path(), PathBuf::from("output/survival_overview.png"));
    }

    #[test]
    fn test_builder_overrides_base() {
        let base = EdaConfig {
            head_rows: 8,
            open_chart: false,
            ..EdaConfig::default()
        };
        let config = EdaConfig::builder()
            .base(base)
            .input_path("elsewhere.csv")
            .build()
            .unwrap();

        assert_eq!(config.input_path, PathBuf::from("elsewhere.csv"));
        assert_eq!(config.head_rows, 8);
        assert!(!config.open_chart);
    }

    #[test]
    fn test_validation_rejects_zero_head_rows() {
        let err = EdaConfig::builder().head_rows(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_validation_rejects_empty_chart() {
        assert!(EdaConfig::builder().chart_size(0, 600).build().is_err());
        assert!(EdaConfig::builder().placeholder("  ").build().is_err());
    }

    #[test]
    fn test_partial_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"head_rows": 3, "fallback": {{"kind": "path", "path": "ref.csv"}}}}"#
        )
        .unwrap();

        let config = EdaConfig::from_json_file(file.path()).unwrap();

        assert_eq!(config.head_rows, 3);
        assert_eq!(
            config.fallback,
            FallbackSource::Path {
                path: PathBuf::from("ref.csv")
            }
        );
        assert_eq!(config.placeholder, "Unknown");
    }

    #[test]
    fn test_malformed_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            EdaConfig::from_json_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
