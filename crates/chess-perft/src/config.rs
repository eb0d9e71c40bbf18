//! Suite configuration for the perft runner.
//!
//! Suites are named positions with the node counts expected at depth 1,
//! 2, ... and are loaded from a TOML file:
//!
//! ```toml
//! [suites.startpos]
//! fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
//! expected = [20, 400, 8902]
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or querying the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Requested suite was not found in the configuration.
    #[error("Suite not found: {0}")]
    SuiteNotFound(String),
}

/// One perft suite entry.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SuiteConfig {
    /// Starting position, optionally prefixed with a variant name
    /// (`"chess960:..."`).
    pub fen: String,
    /// Expected leaf counts; entry `i` is the count at depth `i + 1`.
    #[serde(default)]
    pub expected: Vec<u64>,
}

/// Top-level configuration. Suites are kept ordered by name so runs are
/// reproducible.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct PerftConfig {
    #[serde(default)]
    pub suites: BTreeMap<String, SuiteConfig>,
}

impl PerftConfig {
    /// Loads the configuration at `path`, or the default when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if the file contains invalid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Default configuration path: `perft.toml` in the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("perft.toml")
    }

    /// Retrieves a suite by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SuiteNotFound`] if no suite with the given name exists.
    pub fn get_suite(&self, name: &str) -> Result<&SuiteConfig, ConfigError> {
        self.suites
            .get(name)
            .ok_or_else(|| ConfigError::SuiteNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suites() {
        let toml_content = r#"
[suites.startpos]
fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
expected = [20, 400, 8902]

[suites.horde]
fen = "horde:rnbqkbnr/pppppppp/8/1PP2PP1/PPPPPPPP/PPPPPPPP/PPPPPPPP/PPPPPPPP w kq - 0 1"
expected = [8]
"#;

        let config: PerftConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.suites.len(), 2);

        let startpos = config.get_suite("startpos").unwrap();
        assert_eq!(startpos.expected, vec![20, 400, 8902]);
        assert!(config.get_suite("horde").unwrap().fen.starts_with("horde:"));

        // BTreeMap keeps suites in name order.
        let names: Vec<&str> = config.suites.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["horde", "startpos"]);
    }

    #[test]
    fn test_missing_expected_defaults_to_empty() {
        let config: PerftConfig = toml::from_str(
            r#"
[suites.bare]
fen = "8/8/8/8/8/8/8/K1k5 w - - 0 1"
"#,
        )
        .unwrap();
        assert!(config.get_suite("bare").unwrap().expected.is_empty());
    }

    #[test]
    fn test_empty_config_defaults() {
        let config: PerftConfig = toml::from_str("").unwrap();
        assert!(config.suites.is_empty());
    }

    #[test]
    fn test_get_suite_returns_error_for_unknown_suite() {
        let config = PerftConfig::default();
        match config.get_suite("nonexistent") {
            Err(ConfigError::SuiteNotFound(name)) => assert_eq!(name, "nonexistent"),
            other => panic!("Expected SuiteNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let dir = std::env::temp_dir().join("chess-perft-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("broken.toml");
        std::fs::write(&path, "[suites.x\nfen = ").unwrap();

        let result = PerftConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_returns_default_when_file_does_not_exist() {
        let path = std::env::temp_dir().join("chess-perft-does-not-exist.toml");
        let config = PerftConfig::load(&path).unwrap();
        assert!(config.suites.is_empty());
    }

    #[test]
    fn test_default_path() {
        assert_eq!(PerftConfig::default_path(), PathBuf::from("perft.toml"));
    }
}
