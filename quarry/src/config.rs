//! Configuration management
//!
//! Default config location: `quarry.toml`
//!
//! ```toml
//! [backend]
//! fuzziness = "auto"
//! prefix = "staging_"
//!
//! [logging]
//! level = "info"
//! ```

use crate::{QuarryError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: Settings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-backend settings handed to every compile call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Fuzzy matching for full-text terms: "auto", an edit distance such as
    /// "2", or empty to disable
    #[serde(default = "default_fuzziness")]
    pub fuzziness: Option<String>,

    /// Prepended to every index id to form the engine index name
    #[serde(default)]
    pub prefix: String,
}

fn default_fuzziness() -> Option<String> {
    Some("auto".to_string())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fuzziness: default_fuzziness(),
            prefix: String::new(),
        }
    }
}

impl Settings {
    /// Configured fuzziness, treating an empty value as disabled
    pub fn fuzziness(&self) -> Option<&str> {
        self.fuzziness
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    pub fn without_fuzziness(mut self) -> Self {
        self.fuzziness = None;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Engine index name for a schema index id
    pub fn index_id(&self, index: &str) -> String {
        format!("{}{}", self.prefix, index)
    }

    /// Reject fuzziness values the query-string syntax cannot express
    pub fn validate(&self) -> Result<()> {
        match self.fuzziness() {
            None => Ok(()),
            Some(f) if f.eq_ignore_ascii_case("auto") => Ok(()),
            Some(f) if matches!(f.parse::<u8>(), Ok(0..=2)) => Ok(()),
            Some(f) => Err(QuarryError::Config(format!(
                "fuzziness must be empty, 'auto' or 0-2, got '{}'",
                f
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config from a TOML file, falling back to defaults if it doesn't exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.backend.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.fuzziness(), Some("auto"));
        assert_eq!(config.backend.prefix, "");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = Config::from_toml_str("[backend]\nprefix = \"dev_\"\n").unwrap();
        assert_eq!(config.backend.prefix, "dev_");
        assert_eq!(config.backend.fuzziness(), Some("auto"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_fuzziness_disables() {
        let config = Config::from_toml_str("[backend]\nfuzziness = \"  \"\n").unwrap();
        assert_eq!(config.backend.fuzziness(), None);
        assert_eq!(Settings::default().without_fuzziness().fuzziness(), None);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[backend\nprefix = 1").unwrap_err();
        assert!(matches!(err, crate::QuarryError::Toml(_)));
    }

    #[test]
    fn test_invalid_fuzziness() {
        for bad in ["lots", "3", "-1", "1.5"] {
            let toml = format!("[backend]\nfuzziness = \"{}\"\n", bad);
            let err = Config::from_toml_str(&toml).unwrap_err();
            assert!(matches!(err, crate::QuarryError::Config(_)), "{}", bad);
            assert!(err.to_string().contains(bad));
        }
        assert!(Config::from_toml_str("[backend]\nfuzziness = \"AUTO\"\n").is_ok());
        assert!(Config::from_toml_str("[backend]\nfuzziness = \"0\"\n").is_ok());
    }

    #[test]
    fn test_index_id_prefix() {
        assert_eq!(Settings::default().index_id("articles"), "articles");
        assert_eq!(
            Settings::default().with_prefix("prod_").index_id("articles"),
            "prod_articles"
        );
    }

    #[test]
    fn test_load_or_default() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("quarry.toml");

        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.backend, Settings::default());

        fs::write(&path, "[backend]\nfuzziness = \"2\"\n[logging]\nlevel = \"debug\"\n").unwrap();
        let config = Config::load_or_default(&path).unwrap();
        assert_eq!(config.backend.fuzziness(), Some("2"));
        assert_eq!(config.logging.level, "debug");
    }
}
