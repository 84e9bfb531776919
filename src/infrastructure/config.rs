//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. an explicit path (the `--config` flag)
//! 2. `$TFORMS_CONFIG`
//! 3. `<platform config dir>/tforms/config.toml`
//! 4. Built-in defaults (everything is optional)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::MarkupConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parsing {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub markup: MarkupConfig,
    pub log: LogConfig,
}

/// Log output settings. Logs go to a file so they never draw over the UI.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Log file path. Default: `tforms.log` in the platform cache dir.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            file: None,
        }
    }
}

impl Config {
    /// Loads the first config file found; defaults if none exists. An
    /// explicitly given path must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Where logs are written when the config names no file.
    pub fn log_file(&self) -> PathBuf {
        self.log.file.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.cache_dir().join("tforms.log"))
                .unwrap_or_else(|| std::env::temp_dir().join("tforms.log"))
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("TFORMS_CONFIG") {
        return Some(PathBuf::from(p));
    }
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "tforms", "tforms")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.markup, MarkupConfig::default());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[markup]
invalid_class = "error"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.markup.invalid_class, "error");
        // other fields keep their defaults
        assert_eq!(config.markup.formula_tag, "formula");
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_explicit_file_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[log]\nlevel = \"debug\"\nfile = \"/tmp/forms.log\"\n\n[markup]\ngpa_container_id = \"courses\""
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log_file(), PathBuf::from("/tmp/forms.log"));
        assert_eq!(config.markup.gpa_container_id, "courses");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[markup\nformula_tag = 3").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("parsing "));
    }
}
