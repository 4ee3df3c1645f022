//! Execution limits and the optional `bfkit.toml` config file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Default ceiling on executed instructions per run.
pub const MAX_INSTRUCTIONS: usize = 10_000_000;

/// Default ceiling on distinct memory cells touched per run.
pub const MAX_MEMORY_CELLS: usize = 30_000;

const CONFIG_NAME: &str = "bfkit.toml";

/// Resource ceilings for a single VM run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum instructions executed before the run is aborted.
    pub max_instructions: usize,
    /// Maximum distinct cells touched before the run is aborted.
    pub max_memory_cells: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_instructions: MAX_INSTRUCTIONS,
            max_memory_cells: MAX_MEMORY_CELLS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub limits: Limits,
}

impl Config {
    pub fn from_toml(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Load the config from `path`, or from `bfkit.toml` in the working
/// directory. A missing default file yields the defaults; a missing explicit
/// file is an error.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(CONFIG_NAME);
            if !default.exists() {
                return Ok(Config::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    Config::from_toml(&path, &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_instructions, 10_000_000);
        assert_eq!(limits.max_memory_cells, 30_000);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[limits]
max_instructions = 5000
"#;
        let config = Config::from_toml(Path::new("bfkit.toml"), toml).unwrap();
        assert_eq!(config.limits.max_instructions, 5000);
        assert_eq!(config.limits.max_memory_cells, MAX_MEMORY_CELLS);
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::from_toml(Path::new("bfkit.toml"), "").unwrap();
        assert_eq!(config.limits, Limits::default());
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = Config::from_toml(Path::new("odd.toml"), "[limits]\nmax_instructions = \"x\"")
            .unwrap_err();
        assert!(err.to_string().starts_with("failed to parse odd.toml"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some(Path::new("/nonexistent/bfkit.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
