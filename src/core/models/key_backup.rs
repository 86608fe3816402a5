use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::{DeskError, Result};

/// Version written into every backup this build produces.
pub const BACKUP_VERSION: &str = "1.0";

pub const MISSING_KEYS_MESSAGE: &str = "Invalid key file format. Missing public or private key.";

/// On-disk key pair backup (`pgp-keypair.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyBackup {
    pub public_key: String,
    pub private_key: String,
    pub timestamp: String,
    pub version: String,
}

impl KeyBackup {
    /// Backup stamped with the current time.
    pub fn new(public_key: &str, private_key: &str) -> Self {
        Self {
            public_key: public_key.to_string(),
            private_key: private_key.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            version: BACKUP_VERSION.to_string(),
        }
    }

    /// Pretty-printed JSON, two-space indented.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| DeskError::Provider {
            reason: format!("Failed to serialize key backup: {e}"),
        })
    }

    /// Parse backup contents.
    ///
    /// Accepts the flat layout written by `to_json` and the older nested
    /// `{"keys": {"public", "private"}}` layout. Anything without both keys
    /// is rejected.
    pub fn parse(contents: &str) -> Result<Self> {
        let raw: RawBackup = serde_json::from_str(contents).map_err(|e| DeskError::Format {
            detail: format!("Invalid key file format. Not valid JSON: {e}"),
        })?;

        let (public_key, private_key) = match (raw.public_key, raw.private_key, raw.keys) {
            (Some(public), Some(private), _) => (public, private),
            (_, _, Some(NestedKeys { public, private })) => (
                public.unwrap_or_default(),
                private.unwrap_or_default(),
            ),
            _ => (String::new(), String::new()),
        };

        if public_key.is_empty() || private_key.is_empty() {
            return Err(DeskError::Format {
                detail: MISSING_KEYS_MESSAGE.to_string(),
            });
        }

        Ok(Self {
            public_key,
            private_key,
            timestamp: raw
                .timestamp
                .or(raw.created)
                .unwrap_or_else(|| "Unknown".to_string()),
            version: raw.version.unwrap_or_else(|| BACKUP_VERSION.to_string()),
        })
    }
}

/// Lenient view over every backup layout we have written.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBackup {
    public_key: Option<String>,
    private_key: Option<String>,
    timestamp: Option<String>,
    created: Option<String>,
    version: Option<String>,
    keys: Option<NestedKeys>,
}

#[derive(Debug, Deserialize)]
struct NestedKeys {
    public: Option<String>,
    private: Option<String>,
}

/// A serialized backup ready to be written out.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBackupArtifact {
    pub file_name: String,
    pub contents: String,
}
