//! Configuration management.
//!
//! Defaults for `hostcert provision` live in a TOML file under the platform
//! config directory. Flags always win over the file.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use hostcert_core::KeyAlgorithm;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "HOSTCERT_CONFIG";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output root for certs and machines.
    pub out_dir: Option<PathBuf>,

    /// SSH user recorded in descriptors.
    pub ssh_user: Option<String>,

    /// SSH port recorded in descriptors.
    pub ssh_port: Option<u16>,

    /// Algorithm for generated keys.
    pub key_algorithm: Option<KeyAlgorithm>,

    /// Organization for the CA and client certificates.
    pub organization: Option<String>,
}

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let dirs = ProjectDirs::from("io", "hostcert", "hostcert")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content).with_context(|| format!("writing {}", path.display()))?;

        Ok(())
    }

    /// Set one key from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "out_dir" => self.out_dir = Some(PathBuf::from(value)),
            "ssh_user" => self.ssh_user = Some(value.to_string()),
            "ssh_port" => {
                self.ssh_port = Some(
                    value
                        .parse()
                        .with_context(|| format!("invalid ssh_port {value:?}"))?,
                );
            }
            "key_algorithm" => {
                let algorithm: KeyAlgorithm = value.parse()?;
                algorithm.validate()?;
                self.key_algorithm = Some(algorithm);
            }
            "organization" | "org" => self.organization = Some(value.to_string()),
            _ => {
                anyhow::bail!(
                    "Unknown config key: {}\n\n\
                     Available keys:\n  \
                     out_dir        - Output root for certs/ and machines/\n  \
                     ssh_user       - SSH user written to config.json\n  \
                     ssh_port       - SSH port written to config.json\n  \
                     key_algorithm  - rsa, rsa:<bits>, ecdsa-p256 or ecdsa-p384\n  \
                     organization   - Organization for CA and client certificates",
                    key
                );
            }
        }
        Ok(())
    }
}

/// Organization used when neither a flag nor the config file sets one.
pub fn default_organization() -> Option<String> {
    ["USER", "USERNAME"]
        .into_iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|name| name.trim().to_string())
        .find(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_file() {
        let config: Config = toml::from_str("ssh_user = \"ubuntu\"\nkey_algorithm = \"ecdsa-p256\"\n").unwrap();
        assert_eq!(config.ssh_user.as_deref(), Some("ubuntu"));
        assert_eq!(config.key_algorithm, Some(KeyAlgorithm::EcdsaP256));
        assert_eq!(config.ssh_port, None);
        assert_eq!(config.out_dir, None);
    }

    #[test]
    fn test_set_and_round_trip() {
        let mut config = Config::default();
        config.set("ssh_port", "2222").unwrap();
        config.set("key_algorithm", "rsa:4096").unwrap();
        config.set("org", "acme").unwrap();

        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
        assert_eq!(back.key_algorithm, Some(KeyAlgorithm::Rsa { bits: 4096 }));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("ssh_port", "lots").is_err());
        assert!(config.set("key_algorithm", "rsa:1024").is_err());
        assert!(config.set("api_key", "x").is_err());
        assert_eq!(config, Config::default());
    }
}
