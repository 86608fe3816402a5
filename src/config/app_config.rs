use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::core::errors::{DeskError, Result};
use crate::core::models::keygen::{DEFAULT_EXPIRATION_SECS, KeyAlgorithm, KeyGenConfig, KeyUsage};

/// Current format version supported by this build of pgpdesk.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "pgpdesk.toml";

/// pgpdesk configuration, read from `pgpdesk.toml`.
///
/// Every section is optional; a missing file or section means defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub format_version: u32,
    pub keygen: KeygenSection,
    pub storage: StorageSection,
    pub audit: AuditSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            format_version: CURRENT_FORMAT_VERSION,
            keygen: KeygenSection::default(),
            storage: StorageSection::default(),
            audit: AuditSection::default(),
        }
    }
}

impl AppConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Otherwise `./pgpdesk.toml` and then
    /// `<config dir>/pgpdesk/config.toml` are tried, falling back to
    /// defaults when neither exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(DeskError::InvalidConfig {
                    detail: format!("config file {} not found", path.display()),
                });
            }
            return Self::from_file(path);
        }

        match Self::search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("pgpdesk").join("config.toml"));
        }
        paths
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| match e {
            DeskError::InvalidConfig { detail } => DeskError::InvalidConfig {
                detail: format!("{}: {detail}", path.display()),
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| DeskError::InvalidConfig {
            detail: format!("failed to parse TOML: {e}"),
        })?;

        if config.format_version > CURRENT_FORMAT_VERSION {
            return Err(DeskError::FormatVersionTooNew {
                config_version: config.format_version,
                supported_version: CURRENT_FORMAT_VERSION,
            });
        }
        if config.storage.backup_file.trim().is_empty() {
            return Err(DeskError::InvalidConfig {
                detail: "storage.backup_file must not be empty".into(),
            });
        }
        if config.audit.log_file.trim().is_empty() {
            return Err(DeskError::InvalidConfig {
                detail: "audit.log_file must not be empty".into(),
            });
        }

        Ok(config)
    }
}

/// The `[keygen]` section: defaults for new key pairs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeygenSection {
    pub algorithm: KeyAlgorithm,
    /// Seconds until expiry, 0 for never.
    pub expiration: u64,
    pub sign: bool,
    pub encrypt: bool,
    pub certify: bool,
    pub comment: String,
}

impl Default for KeygenSection {
    fn default() -> Self {
        Self {
            algorithm: KeyAlgorithm::default(),
            expiration: DEFAULT_EXPIRATION_SECS,
            sign: true,
            encrypt: true,
            certify: true,
            comment: String::new(),
        }
    }
}

impl KeygenSection {
    pub fn to_keygen_config(&self) -> KeyGenConfig {
        KeyGenConfig {
            algorithm: self.algorithm,
            expiration_secs: self.expiration,
            usage: KeyUsage {
                sign: self.sign,
                encrypt: self.encrypt,
                certify: self.certify,
            },
            comment: self.comment.clone(),
        }
    }
}

/// The `[storage]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub backup_file: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            backup_file: "pgp-keypair.json".to_string(),
        }
    }
}

/// The `[audit]` section.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    pub enabled: bool,
    pub log_file: String,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            enabled: true,
            log_file: "pgpdesk-audit.log".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage.backup_file, "pgp-keypair.json");
        assert!(config.audit.enabled);
        assert_eq!(config.keygen.to_keygen_config(), KeyGenConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::parse(
            r#"
            [keygen]
            algorithm = "rsa4096"
            expiration = 0
            encrypt = false
            comment = "work"

            [audit]
            enabled = false
            "#,
        )
        .unwrap();

        let keygen = config.keygen.to_keygen_config();
        assert_eq!(keygen.algorithm, KeyAlgorithm::Rsa4096);
        assert_eq!(keygen.expiration_secs, 0);
        assert!(keygen.usage.sign);
        assert!(!keygen.usage.encrypt);
        assert_eq!(keygen.comment, "work");
        assert!(!config.audit.enabled);
        assert_eq!(config.audit.log_file, "pgpdesk-audit.log");
    }

    #[test]
    fn unknown_algorithm_is_rejected() {
        let err = AppConfig::parse("[keygen]\nalgorithm = \"dsa\"\n").unwrap_err();
        assert!(matches!(err, DeskError::InvalidConfig { .. }));
    }

    #[test]
    fn newer_format_version_is_rejected() {
        let err = AppConfig::parse("format_version = 99\n").unwrap_err();
        assert!(matches!(
            err,
            DeskError::FormatVersionTooNew {
                config_version: 99,
                supported_version: CURRENT_FORMAT_VERSION
            }
        ));
    }

    #[test]
    fn empty_backup_file_is_rejected() {
        let err = AppConfig::parse("[storage]\nbackup_file = \" \"\n").unwrap_err();
        assert!(err.to_string().contains("backup_file"));
    }

    #[test]
    fn explicit_path_must_exist() {
        let tmp = TempDir::new().unwrap();
        let err = AppConfig::load(Some(&tmp.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, DeskError::InvalidConfig { .. }));
    }

    #[test]
    fn explicit_path_is_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        std::fs::write(&path, "[storage]\nbackup_file = \"mine.json\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.storage.backup_file, "mine.json");
    }

    #[test]
    fn parse_errors_name_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.toml");
        std::fs::write(&path, "[keygen\n").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
