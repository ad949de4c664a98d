use crate::error::{Result, ValSplitError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_ID_FIELD: &str = "Valuation_ID";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub selector: SelectorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub id_field: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub included_suffix: String,
    pub excluded_suffix: String,
    pub pretty: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub kind: SelectorKind,
    pub summary_fields: Vec<String>,
    pub max_summary_fields: usize,
    pub page_size: usize,
}

/// Which front-end collects the exclusions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    /// Checklist on an interactive terminal, text menu otherwise
    #[default]
    Auto,
    /// Keyboard-driven checkbox list
    Checklist,
    /// Numbered list answered with comma-separated indices
    Menu,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            id_field: DEFAULT_ID_FIELD.to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            included_suffix: "_PropertiesIncluded".to_string(),
            excluded_suffix: "_PropertiesExcluded".to_string(),
            pretty: true,
            directory: None,
        }
    }
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            kind: SelectorKind::Auto,
            summary_fields: Vec::new(), // empty: first scalar fields of each record
            max_summary_fields: 3,
            page_size: 15,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ValSplitError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ValSplitError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ValSplitError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        log::debug!("event=config_loaded path={}", path.display());
        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["valsplit.toml", ".valsplit.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref id_field) = cli_args.id_field {
            self.input.id_field = id_field.trim().to_string();
        }

        if let Some(kind) = cli_args.selector {
            self.selector.kind = kind;
        }

        if let Some(ref directory) = cli_args.output_dir {
            self.output.directory = Some(directory.clone());
        }

        if let Some(pretty) = cli_args.pretty {
            self.output.pretty = pretty;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| ValSplitError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| ValSplitError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.input.id_field.trim().is_empty() {
            return Err(ValSplitError::Config {
                message: "Identifier field name must not be empty".to_string(),
            });
        }

        if self.output.included_suffix.is_empty() || self.output.excluded_suffix.is_empty() {
            return Err(ValSplitError::Config {
                message: "Output file suffixes must not be empty".to_string(),
            });
        }

        // Both outputs would land on the same path
        if self.output.included_suffix == self.output.excluded_suffix {
            return Err(ValSplitError::Config {
                message: format!(
                    "Included and excluded suffixes must differ (both are `{}`)",
                    self.output.included_suffix
                ),
            });
        }

        if self.selector.page_size == 0 {
            return Err(ValSplitError::Config {
                message: "Selector page size must be greater than 0".to_string(),
            });
        }

        if let Some(ref directory) = self.output.directory {
            if !directory.is_dir() {
                return Err(ValSplitError::Config {
                    message: format!("Output directory does not exist: {}", directory.display()),
                });
            }
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub id_field: Option<String>,
    pub selector: Option<SelectorKind>,
    pub output_dir: Option<PathBuf>,
    pub pretty: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id_field(mut self, id_field: Option<String>) -> Self {
        self.id_field = id_field;
        self
    }

    pub fn with_selector(mut self, selector: Option<SelectorKind>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_pretty(mut self, pretty: Option<bool>) -> Self {
        self.pretty = pretty;
        self
    }
}
