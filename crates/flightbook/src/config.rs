//! Configuration management for flightbook.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::ids::IdStrategy;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "flightbook";

/// Default ledger file name.
const LEDGER_FILE_NAME: &str = "bookings.txt";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "FLIGHTBOOK_";

/// BLAKE3 digest of the stock admin password.
///
/// The admin gate only decides whether the full listing is shown; it is a
/// placeholder and not a security boundary. Override it per installation.
const DEFAULT_ADMIN_DIGEST: &str =
    "cde13a55f41e387480391c47238acfe9c0136dd56bf365b01416aec03eec7dc4";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLIGHTBOOK_`, sections separated by `__`)
/// 2. TOML config file at `~/.config/flightbook/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ledger file configuration.
    pub ledger: LedgerConfig,
    /// Booking creation configuration.
    pub booking: BookingConfig,
    /// Admin listing gate.
    pub admin: AdminConfig,
}

/// Ledger-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Path to the ledger file.
    /// Defaults to `~/.local/share/flightbook/bookings.txt`
    pub path: Option<PathBuf>,
    /// Fsync after every append and before every rewrite is swapped in.
    pub sync_writes: bool,
}

/// Booking-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// How booking ids are drawn.
    pub id_strategy: IdStrategy,
    /// Ids are `BKG<n>` with `n` in `0..id_range`.
    pub id_range: u32,
    /// Redraws allowed by the `checked` strategy before giving up.
    pub max_id_attempts: u32,
}

/// Admin gate configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Admin user name.
    pub username: String,
    /// Hex BLAKE3 digest of the admin password.
    pub password_blake3: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            path: None, // Will be resolved to default at runtime
            sync_writes: true,
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Random,
            id_range: 9999,
            max_id_attempts: 32,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password_blake3: DEFAULT_ADMIN_DIGEST.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.booking.id_range == 0 {
            return Err(Error::ConfigValidation {
                message: "id_range must be greater than 0".to_string(),
            });
        }

        if self.booking.max_id_attempts == 0 {
            return Err(Error::ConfigValidation {
                message: "max_id_attempts must be greater than 0".to_string(),
            });
        }

        if self.admin.username.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "admin username must not be empty".to_string(),
            });
        }

        if blake3::Hash::from_hex(&self.admin.password_blake3).is_err() {
            return Err(Error::ConfigValidation {
                message: "password_blake3 must be a 64-character hex BLAKE3 digest".to_string(),
            });
        }

        Ok(())
    }

    /// Get the ledger path, resolving defaults if not set.
    #[must_use]
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(LEDGER_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.ledger.path.is_none());
        assert!(config.ledger.sync_writes);
        assert_eq!(config.booking.id_strategy, IdStrategy::Random);
        assert_eq!(config.booking.id_range, 9999);
        assert_eq!(config.booking.max_id_attempts, 32);
        assert_eq!(config.admin.username, "admin");
    }

    #[test]
    fn test_default_admin_digest_matches_stock_password() {
        let digest = blake3::hash(b"1234").to_hex().to_string();
        assert_eq!(AdminConfig::default().password_blake3, digest);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_id_range() {
        let mut config = Config::default();
        config.booking.id_range = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("id_range"));
    }

    #[test]
    fn test_validate_zero_attempts() {
        let mut config = Config::default();
        config.booking.max_id_attempts = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("max_id_attempts"));
    }

    #[test]
    fn test_validate_blank_username() {
        let mut config = Config::default();
        config.admin.username = "  ".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("username"));
    }

    #[test]
    fn test_validate_bad_digest() {
        let mut config = Config::default();
        config.admin.password_blake3 = "1234".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("password_blake3"));
    }

    #[test]
    fn test_ledger_path_default() {
        let config = Config::default();
        let path = config.ledger_path();

        assert!(path.to_string_lossy().contains("flightbook"));
        assert!(path.to_string_lossy().ends_with("bookings.txt"));
    }

    #[test]
    fn test_ledger_path_custom() {
        let mut config = Config::default();
        config.ledger.path = Some(PathBuf::from("/custom/path/ledger.txt"));

        assert_eq!(config.ledger_path(), PathBuf::from("/custom/path/ledger.txt"));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("flightbook"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(
            &file,
            "[ledger]\npath = \"/srv/bookings.txt\"\nsync_writes = false\n\n\
             [booking]\nid_strategy = \"checked\"\nid_range = 100\n",
        )
        .unwrap();

        let config = Config::load_from(Some(file)).unwrap();
        assert_eq!(config.ledger_path(), PathBuf::from("/srv/bookings.txt"));
        assert!(!config.ledger.sync_writes);
        assert_eq!(config.booking.id_strategy, IdStrategy::Checked);
        assert_eq!(config.booking.id_range, 100);
        assert_eq!(config.booking.max_id_attempts, 32);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("config.toml");
        std::fs::write(&file, "[booking]\nid_range = 0\n").unwrap();

        let err = Config::load_from(Some(file)).unwrap_err();
        assert!(matches!(err, Error::ConfigValidation { .. }));
    }

    #[test]
    fn test_booking_config_deserialize() {
        let json = r#"{"id_strategy": "checked", "id_range": 50}"#;
        let booking: BookingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(booking.id_strategy, IdStrategy::Checked);
        assert_eq!(booking.id_range, 50);
        assert_eq!(booking.max_id_attempts, 32);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("sync_writes"));
        assert!(json.contains("\"id_strategy\":\"random\""));
    }
}
