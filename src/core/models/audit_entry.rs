use serde::{Deserialize, Serialize};

use crate::core::errors::{DeskError, ErrorClass};
use crate::core::models::action::Action;

/// How an orchestrated operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    /// Verification completed but no signature was valid.
    VerificationFailed,
    ValidationError,
    PassphraseError,
    FormatError,
    ProviderError,
    EnvironmentError,
}

impl From<&DeskError> for Outcome {
    fn from(err: &DeskError) -> Self {
        match err.class() {
            ErrorClass::Validation => Outcome::ValidationError,
            ErrorClass::Passphrase => Outcome::PassphraseError,
            ErrorClass::Format => Outcome::FormatError,
            ErrorClass::Provider => Outcome::ProviderError,
            ErrorClass::Environment => Outcome::EnvironmentError,
        }
    }
}

/// A single entry in the activity journal (JSON lines format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub action: Action,
    pub outcome: Outcome,
    pub key_id: Option<String>,
    pub detail: Option<String>,
    pub state_hash: Option<String>,
}
