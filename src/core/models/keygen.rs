use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Two years, the default key lifetime.
pub const DEFAULT_EXPIRATION_SECS: u64 = 63_072_000;

const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Public-key algorithm offered for new keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAlgorithm {
    /// Curve25519 (EdDSA signing, ECDH encryption).
    #[default]
    Ecc,
    Rsa2048,
    Rsa4096,
}

impl KeyAlgorithm {
    /// Short upper-case label stored in key metadata.
    pub fn label(self) -> &'static str {
        match self {
            KeyAlgorithm::Ecc => "ECC",
            KeyAlgorithm::Rsa2048 => "RSA2048",
            KeyAlgorithm::Rsa4096 => "RSA4096",
        }
    }
}

impl fmt::Display for KeyAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAlgorithm::Ecc => write!(f, "ECC (Curve25519)"),
            KeyAlgorithm::Rsa2048 => write!(f, "RSA 2048-bit"),
            KeyAlgorithm::Rsa4096 => write!(f, "RSA 4096-bit"),
        }
    }
}

impl FromStr for KeyAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ecc" | "curve25519" | "ed25519" => Ok(KeyAlgorithm::Ecc),
            "rsa2048" => Ok(KeyAlgorithm::Rsa2048),
            "rsa4096" => Ok(KeyAlgorithm::Rsa4096),
            other => Err(format!(
                "unknown algorithm '{other}' (expected ecc, rsa2048 or rsa4096)"
            )),
        }
    }
}

/// Capabilities requested for a new key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyUsage {
    pub sign: bool,
    pub encrypt: bool,
    pub certify: bool,
}

impl Default for KeyUsage {
    fn default() -> Self {
        Self {
            sign: true,
            encrypt: true,
            certify: true,
        }
    }
}

impl KeyUsage {
    pub fn any(&self) -> bool {
        self.sign || self.encrypt || self.certify
    }
}

impl fmt::Display for KeyUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.sign {
            parts.push("Sign");
        }
        if self.encrypt {
            parts.push("Encrypt");
        }
        if self.certify {
            parts.push("Certify");
        }
        if parts.is_empty() {
            write!(f, "None selected")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

/// Advanced options for key generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyGenConfig {
    pub algorithm: KeyAlgorithm,
    /// Seconds until expiry; 0 means the key never expires.
    pub expiration_secs: u64,
    pub usage: KeyUsage,
    pub comment: String,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            algorithm: KeyAlgorithm::default(),
            expiration_secs: DEFAULT_EXPIRATION_SECS,
            usage: KeyUsage::default(),
            comment: String::new(),
        }
    }
}

impl KeyGenConfig {
    /// Human-readable expiration, e.g. "Never expires" or "2 years".
    pub fn expiration_label(&self) -> String {
        if self.expiration_secs == 0 {
            return "Never expires".to_string();
        }
        let years = (self.expiration_secs as f64 / SECONDS_PER_YEAR as f64).round() as u64;
        if years == 1 {
            "1 year".to_string()
        } else {
            format!("{years} years")
        }
    }
}

/// Who a new key belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub name: String,
    pub email: String,
}

impl UserIdentity {
    /// OpenPGP user id: `name (comment) <email>`, or `name <email>` without a comment.
    pub fn user_id(&self, comment: &str) -> String {
        if comment.is_empty() {
            format!("{} <{}>", self.name, self.email)
        } else {
            format!("{} ({}) <{}>", self.name, comment, self.email)
        }
    }
}

/// Everything the provider needs to create a key pair.
#[derive(Debug, Clone)]
pub struct KeyGenRequest {
    pub identity: UserIdentity,
    pub passphrase: String,
    pub config: KeyGenConfig,
}
