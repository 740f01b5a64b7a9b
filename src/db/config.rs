//! Database configuration file support.
//!
//! Connection settings for the SDB and the archive database are read from a
//! TOML configuration file, with environment variables taking precedence for
//! passwords so they never need to live on disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::error::RepositoryError;

/// Configuration for both databases the pipeline talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub sdb: ConnectionSettings,
    pub archive: ConnectionSettings,
}

/// Connection settings for one database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSettings {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

fn default_port() -> u16 {
    3306
}

fn default_connect_timeout() -> u64 {
    30
}

impl DatabaseConfig {
    /// Load database configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(DatabaseConfig)` if the file exists and parses
    /// * `Err(RepositoryError::Configuration)` otherwise
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let mut config: DatabaseConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Overlay passwords from `SDB_PASSWORD` / `SSDA_PASSWORD` when set.
    fn apply_env_overrides(&mut self) {
        if let Ok(password) = std::env::var("SDB_PASSWORD") {
            self.sdb.password = password;
        }
        if let Ok(password) = std::env::var("SSDA_PASSWORD") {
            self.archive.password = password;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXAMPLE: &str = r#"
[sdb]
host = "sdb.example.saao.ac.za"
database = "sdb"
username = "archive_reader"

[archive]
host = "ssda.example.saao.ac.za"
port = 5432
database = "ssda"
username = "archive_writer"
"#;

    #[test]
    fn test_load_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXAMPLE.as_bytes()).unwrap();

        let config = DatabaseConfig::from_file(file.path()).unwrap();
        assert_eq!(config.sdb.host, "sdb.example.saao.ac.za");
        assert_eq!(config.sdb.port, 3306); // default
        assert_eq!(config.archive.port, 5432);
        assert_eq!(config.sdb.connect_timeout, 30); // default
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = DatabaseConfig::from_file("/nonexistent/ssda.toml").unwrap_err();
        assert!(matches!(err, RepositoryError::Configuration { .. }));
    }

    #[test]
    fn test_malformed_toml_is_configuration_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not valid toml [[").unwrap();
        let err = DatabaseConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, RepositoryError::Configuration { .. }));
    }
}
