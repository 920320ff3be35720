//! User configuration
//!
//! Loaded from a YAML file in the platform config directory
//! (e.g. `~/.config/citview/config.yaml`). Every field is optional.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

/// Default sidebar width
pub const DEFAULT_SIDEBAR_WIDTH: u16 = 40;
/// Minimum sidebar width
pub const MIN_SIDEBAR_WIDTH: u16 = 20;
/// Maximum sidebar width
pub const MAX_SIDEBAR_WIDTH: u16 = 80;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External tool executable
    pub tool: String,
    /// Editor command used to open files
    pub editor: Option<String>,
    /// Whether dotfiles are listed in the tree
    pub show_hidden: bool,
    pub sidebar_width: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool: "cit".to_string(),
            editor: None,
            show_hidden: true,
            sidebar_width: DEFAULT_SIDEBAR_WIDTH,
        }
    }
}

impl Config {
    /// Platform config file location
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Load configuration
    ///
    /// An explicit `path` must exist. The default location is optional and
    /// falls back to built-in defaults when absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

        Self::from_yaml(&contents).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Parse YAML, filling unset fields with defaults
    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut config: Self = serde_yaml::from_str(contents)?;
        config.sidebar_width = config
            .sidebar_width
            .clamp(MIN_SIDEBAR_WIDTH, MAX_SIDEBAR_WIDTH);
        Ok(config)
    }

    /// Editor program and arguments: config, then `$VISUAL`, `$EDITOR`, then `vi`
    pub fn editor_command(&self) -> Vec<String> {
        let command = self
            .editor
            .clone()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| env::var("VISUAL").ok().filter(|e| !e.trim().is_empty()))
            .or_else(|| env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| "vi".to_string());

        command.split_whitespace().map(String::from).collect()
    }
}

/// Platform directories for this application
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "citview")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml("\n  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_yaml("tool: /opt/cit/bin/cit\nshow_hidden: false\n").unwrap();
        assert_eq!(config.tool, "/opt/cit/bin/cit");
        assert!(!config.show_hidden);
        assert_eq!(config.editor, None);
        assert_eq!(config.sidebar_width, DEFAULT_SIDEBAR_WIDTH);
    }

    #[test]
    fn test_sidebar_width_is_clamped() {
        let config = Config::from_yaml("sidebar_width: 500").unwrap();
        assert_eq!(config.sidebar_width, MAX_SIDEBAR_WIDTH);

        let config = Config::from_yaml("sidebar_width: 3").unwrap();
        assert_eq!(config.sidebar_width, MIN_SIDEBAR_WIDTH);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(Config::from_yaml("show_hidden: [not, a, bool]").is_err());
    }

    #[test]
    fn test_configured_editor_wins() {
        let config = Config {
            editor: Some("code --wait".to_string()),
            ..Config::default()
        };
        assert_eq!(config.editor_command(), vec!["code", "--wait"]);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "editor: nano\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.editor.as_deref(), Some("nano"));
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
