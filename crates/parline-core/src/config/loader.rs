//! Configuration file discovery and loading

use super::ParlineConfig;
use crate::error::ParlineError;
use std::fs;
use std::path::{Path, PathBuf};

pub use crate::result::Result;

/// Config file names in priority order
pub const CONFIG_FILE_NAMES: &[&str] = &["parline.toml", ".parlinerc.json"];

/// Configuration loader for discovering and loading config files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Auto-discover config file by traversing upward from start_path
    ///
    /// Searches each directory for `parline.toml`, then `.parlinerc.json`,
    /// moving up the directory tree until a config is found or the
    /// filesystem root is reached.
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| ParlineError::config_error(format!("Invalid path: {e}")))?;
        if current.is_file() {
            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            }
        }

        loop {
            for filename in CONFIG_FILE_NAMES {
                let config_path = current.join(filename);
                if config_path.is_file() {
                    tracing::debug!("Found config: {}", config_path.display());
                    return Ok(Some(config_path));
                }
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Load configuration from a specific file
    ///
    /// The format is chosen by extension: `.toml` or `.json`.
    pub fn load_from_file(path: &Path) -> Result<ParlineConfig> {
        let content =
            fs::read_to_string(path).map_err(|e| ParlineError::io_error(path, e))?;

        Self::parse(&content, path)
    }

    /// Parse configuration text, using `path` to pick the format
    pub fn parse(content: &str, path: &Path) -> Result<ParlineConfig> {
        let parsed = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(content).map_err(|e| e.to_string()),
            Some("json") => serde_json::from_str(content).map_err(|e| e.to_string()),
            _ => Err("unsupported config format (expected .toml or .json)".to_string()),
        };

        parsed.map_err(|e| {
            ParlineError::config_error(format!(
                "Failed to load config from '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load config from path or auto-discover
    ///
    /// An explicit path must exist. Without one, the directory tree above
    /// `start_dir` is searched; when nothing is found the defaults apply.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<ParlineConfig> {
        let config_path = match custom_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ParlineError::config_error(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => Self::auto_discover(start_dir.unwrap_or_else(|| Path::new(".")))?,
        };

        match config_path {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(ParlineConfig::default())
            }
        }
    }

    /// Starter `parline.toml` written by `parline config init`
    pub fn default_toml() -> String {
        let mut config = ParlineConfig {
            linter: Some(Default::default()),
            formatter: Some(Default::default()),
            files: Some(Default::default()),
        };
        if let Some(linter) = config.linter.as_mut() {
            linter.rules.insert(
                crate::rules::PARAMETERS_ON_SEPARATE_LINES.id.to_string(),
                super::RuleSeverity::Warn,
            );
        }
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
