//! Configuration management for the pdakit CLI
//!
//! Config is stored at ~/.config/pdakit/config.toml

use crate::error::{PdakitError, PdakitResult};
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::CommitmentConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default RPC URL (mainnet-beta)
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Default commitment for account reads
pub const DEFAULT_COMMITMENT: &str = "confirmed";

const COMMITMENT_LEVELS: [&str; 3] = ["processed", "confirmed", "finalized"];

/// Config directory name
const CONFIG_DIR: &str = "pdakit";

/// Config file name
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// RPC URL for fetching IDLs and seed accounts
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Commitment used when reading accounts for field seeds
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_commitment() -> String {
    DEFAULT_COMMITMENT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            commitment: default_commitment(),
        }
    }
}

impl Config {
    /// Get the config directory path (~/.config/pdakit/)
    pub fn dir_path() -> PdakitResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(CONFIG_DIR))
            .ok_or_else(|| PdakitError::ConfigError("Could not determine config directory".into()))
    }

    /// Get the config file path (~/.config/pdakit/config.toml)
    pub fn file_path() -> PdakitResult<PathBuf> {
        Self::dir_path().map(|p| p.join(CONFIG_FILE))
    }

    /// Load config from the default location
    pub fn load() -> PdakitResult<Self> {
        Self::load_from(&Self::file_path()?)
    }

    /// Load config from `path`, returning defaults if the file doesn't exist
    pub fn load_from(path: &Path) -> PdakitResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;

        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(&contents)
            .map_err(|e| PdakitError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save config to the default location
    pub fn save(&self) -> PdakitResult<()> {
        self.save_to(&Self::file_path()?)
    }

    /// Save config to `path`, creating directories if needed
    pub fn save_to(&self, path: &Path) -> PdakitResult<()> {
        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| PdakitError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, contents)?;

        Ok(())
    }

    /// Validate the config values
    pub fn validate(&self) -> PdakitResult<()> {
        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err(PdakitError::ConfigError(
                "RPC URL must start with http:// or https://".into(),
            ));
        }

        if !COMMITMENT_LEVELS.contains(&self.commitment.as_str()) {
            return Err(PdakitError::ConfigError(format!(
                "commitment must be one of {}, got '{}'",
                COMMITMENT_LEVELS.join(", "),
                self.commitment
            )));
        }

        Ok(())
    }

    pub fn commitment_config(&self) -> PdakitResult<CommitmentConfig> {
        CommitmentConfig::from_str(&self.commitment)
            .map_err(|_| PdakitError::ConfigError(format!("unknown commitment '{}'", self.commitment)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::commitment_config::CommitmentLevel;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.commitment, "confirmed");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config {
            rpc_url: "http://localhost:8899".into(),
            commitment: "finalized".into(),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.commitment_config().unwrap().commitment,
            CommitmentLevel::Finalized
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "rpc_url = \"http://localhost:8899\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.rpc_url, "http://localhost:8899");
        assert_eq!(config.commitment, DEFAULT_COMMITMENT);
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());

        let bad_url = Config {
            rpc_url: "localhost".into(),
            ..Config::default()
        };
        assert!(bad_url.validate().is_err());

        let bad_commitment = Config {
            commitment: "max".into(),
            ..Config::default()
        };
        let err = bad_commitment.validate().unwrap_err();
        assert!(err.to_string().contains("processed, confirmed, finalized"));
    }
}
