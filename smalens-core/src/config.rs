//! Viewer configuration, read from TOML.
//!
//! ```toml
//! source = "Stocks_2025.csv"
//!
//! [pipeline]
//! window_scope = "global"      # or "per_instrument"
//! null_policy = "skip"         # or "propagate"
//! delimiter = ","
//! date_formats = ["%d.%m.%Y"]
//! ```
//!
//! Lookup order for `discover`: explicit path, `./smalens.toml`,
//! `<config_dir>/smalens/config.toml`, built-in defaults. `SMALENS_SOURCE`
//! overrides `source` in every case.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::aggregate::WindowScope;
use crate::data::dates;
use crate::indicators::NullPolicy;

pub const DEFAULT_SOURCE: &str = "Stocks_2025.csv";
pub const LOCAL_CONFIG_FILE: &str = "smalens.toml";
pub const SOURCE_ENV_VAR: &str = "SMALENS_SOURCE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Pipeline knobs. Window sizes are fixed at 50 and 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub window_scope: WindowScope,
    pub null_policy: NullPolicy,
    pub delimiter: char,
    pub date_formats: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_scope: WindowScope::Global,
            null_policy: NullPolicy::Skip,
            delimiter: ',',
            date_formats: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Delimiter as the single byte the CSV reader wants.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        let c = self.delimiter;
        if !c.is_ascii() || matches!(c, '"' | '\n' | '\r') {
            return Err(ConfigError::Invalid(format!(
                "delimiter {c:?} must be a single ASCII character other than a quote or newline"
            )));
        }
        Ok(c as u8)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.delimiter_byte()?;
        if let Some(bad) = self.date_formats.iter().find(|f| !dates::is_valid_format(f)) {
            return Err(ConfigError::Invalid(format!("unusable date format {bad:?}")));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_source")]
    pub source: PathBuf,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

fn default_source() -> PathBuf {
    PathBuf::from(DEFAULT_SOURCE)
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Resolve the config from the usual places, then apply `SMALENS_SOURCE`.
    ///
    /// An explicit path that cannot be read is an error; the implicit
    /// locations are skipped when absent.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::candidate_paths().into_iter().find(|p| p.is_file()) {
                Some(path) => {
                    debug!(path = %path.display(), "using config file");
                    Self::from_file(&path)?
                }
                None => Self::default(),
            },
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Implicit config locations, most specific first.
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("smalens").join("config.toml"));
        }
        paths
    }

    /// Apply environment overrides through `lookup` (injected for tests).
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(source) = lookup(SOURCE_ENV_VAR).filter(|s| !s.trim().is_empty()) {
            self.source = PathBuf::from(source);
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("source path is empty".into()));
        }
        self.pipeline.validate()
    }
}
