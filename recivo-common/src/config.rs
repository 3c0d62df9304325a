//! Configuration loading for Recivo services
//!
//! Resolution priority, highest first:
//! 1. Environment variables (`RECIVO_*`)
//! 2. TOML config file (`$RECIVO_CONFIG`, else the platform config dir)
//! 3. Compiled defaults

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Service configuration for the receipt analysis microservice
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// SQLite database file location
    pub database_path: PathBuf,
    /// Remote classification service settings
    pub classifier: ClassifierConfig,
}

/// Remote classification service settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Base URL of the classification API
    pub base_url: String,
    /// Upper bound on one classification call; exceeding it is a
    /// transport failure, not a business rejection
    pub timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5810,
            database_path: default_database_path(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3001".to_string(),
            timeout_seconds: 65,
        }
    }
}

impl ServiceConfig {
    /// Load configuration with the standard priority order
    pub fn load() -> Result<Self> {
        let mut config = match config_file_path() {
            Some(path) if path.exists() => {
                tracing::info!(path = %path.display(), "Loading config file");
                Self::from_file(&path)?
            }
            _ => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse a TOML config file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Apply `RECIVO_*` environment variable overrides
    ///
    /// Invalid numeric values fail fast rather than silently keeping the
    /// file/default value.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("RECIVO_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("RECIVO_PORT") {
            self.port = port
                .parse()
                .map_err(|_| Error::Config(format!("invalid RECIVO_PORT: {port}")))?;
        }
        if let Ok(path) = std::env::var("RECIVO_DATABASE_PATH") {
            self.database_path = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("RECIVO_CLASSIFIER_URL") {
            self.classifier.base_url = url;
        }
        if let Ok(secs) = std::env::var("RECIVO_CLASSIFIER_TIMEOUT_SECS") {
            self.classifier.timeout_seconds = secs.parse().map_err(|_| {
                Error::Config(format!("invalid RECIVO_CLASSIFIER_TIMEOUT_SECS: {secs}"))
            })?;
        }
        Ok(())
    }
}

/// Config file location: `$RECIVO_CONFIG`, else the platform config dir
fn config_file_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("RECIVO_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|d| d.join("recivo").join("config.toml"))
}

/// Default database location under the platform data dir
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("recivo").join("recivo.db"))
        .unwrap_or_else(|| PathBuf::from("recivo.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ServiceConfig::default();
        assert_eq!(config.port, 5810);
        assert_eq!(config.classifier.timeout_seconds, 65);
        assert!(config.classifier.base_url.starts_with("http://"));
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_keys() {
        let config: ServiceConfig = toml::from_str(
            r#"
            port = 8080

            [classifier]
            base_url = "http://classifier.internal:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.classifier.base_url, "http://classifier.internal:9000");
        assert_eq!(config.classifier.timeout_seconds, 65);
    }

    #[test]
    fn from_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "host = \"0.0.0.0\"\nport = 9999\ndatabase_path = \"/tmp/recivo-test.db\"\n",
        )
        .unwrap();

        let config = ServiceConfig::from_file(&path).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9999);
        assert_eq!(config.database_path, PathBuf::from("/tmp/recivo-test.db"));
    }

    #[test]
    fn from_file_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "port = \"not a number\"").unwrap();

        assert!(matches!(
            ServiceConfig::from_file(&path),
            Err(Error::Config(_))
        ));
    }
}
