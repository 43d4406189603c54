//! Editor configuration
//!
//! Stored as YAML in `~/.config/textedit/config.yaml`. Every field has a default,
//! so a partial file (or none at all) is fine. Region tables are checked here so
//! the line buffer never sees a delimiter it cannot match.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::editable::{ColorRegion, RegionError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("tab_size must be between 1 and 16, got {0}")]
    InvalidTabSize(usize),
    #[error("region #{index}: {source}")]
    InvalidRegion {
        index: usize,
        #[source]
        source: RegionError,
    },
}

pub const MAX_TAB_SIZE: usize = 16;

/// A region delimiter pair as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub begin: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub line_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Characters after which an empty prefix still opens completion (e.g. `.`)
    #[serde(default = "default_completion_prefixes")]
    pub prefixes: Vec<String>,
    /// Keywords after which `keyword ` opens completion with an empty prefix
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Rows shown by the popup; page up/down moves by this many
    #[serde(default = "default_completion_lines")]
    pub visible_lines: usize,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prefixes: default_completion_prefixes(),
            keywords: Vec::new(),
            visible_lines: default_completion_lines(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,
    /// Extra pixels between rows
    #[serde(default = "default_line_spacing")]
    pub line_spacing: usize,
    #[serde(default = "default_true")]
    pub undo_enabled: bool,
    /// Committed undo operations kept; unlimited when absent
    #[serde(default)]
    pub history_limit: Option<usize>,
    #[serde(default)]
    pub readonly: bool,
    /// Overwrite mode
    #[serde(default)]
    pub insert_mode: bool,
    #[serde(default = "default_true")]
    pub auto_indent: bool,
    #[serde(default)]
    pub auto_brace_completion: bool,
    #[serde(default)]
    pub scroll_past_end_of_file: bool,
    /// Window after a double-click in which another one selects the line
    #[serde(default = "default_triple_click_ms")]
    pub triple_click_ms: u64,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub regions: Vec<RegionConfig>,
}

fn default_true() -> bool {
    true
}

fn default_tab_size() -> usize {
    4
}

fn default_line_spacing() -> usize {
    4
}

fn default_triple_click_ms() -> u64 {
    600
}

fn default_completion_prefixes() -> Vec<String> {
    vec![".".to_string()]
}

fn default_completion_lines() -> usize {
    7
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_size: default_tab_size(),
            line_spacing: default_line_spacing(),
            undo_enabled: true,
            history_limit: None,
            readonly: false,
            insert_mode: false,
            auto_indent: true,
            auto_brace_completion: false,
            scroll_past_end_of_file: false,
            triple_click_ms: default_triple_click_ms(),
            completion: CompletionConfig::default(),
            regions: Vec::new(),
        }
    }
}

impl EditorConfig {
    /// Load config from the default location, or return defaults if missing or invalid
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load and validate a config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write config as YAML, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(write_err)?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tab_size == 0 || self.tab_size > MAX_TAB_SIZE {
            return Err(ConfigError::InvalidTabSize(self.tab_size));
        }
        self.color_regions().map(|_| ())
    }

    /// Region table as the line buffer consumes it
    pub fn color_regions(&self) -> Result<Vec<ColorRegion>, ConfigError> {
        self.regions
            .iter()
            .enumerate()
            .map(|(index, r)| {
                ColorRegion::new(r.begin.as_str(), r.end.as_str(), r.line_only)
                    .map_err(|source| ConfigError::InvalidRegion { index, source })
            })
            .collect()
    }
}
