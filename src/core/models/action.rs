use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A user-facing operation of the workbench.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Generate,
    Sign,
    Verify,
    Encrypt,
    Decrypt,
    Save,
    Load,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Generate,
        Action::Sign,
        Action::Verify,
        Action::Encrypt,
        Action::Decrypt,
        Action::Save,
        Action::Load,
    ];

    /// Whether this action stays disabled until a key pair is held.
    pub fn requires_keys(self) -> bool {
        matches!(
            self,
            Action::Sign | Action::Verify | Action::Encrypt | Action::Decrypt | Action::Save
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Generate => "generate",
            Action::Sign => "sign",
            Action::Verify => "verify",
            Action::Encrypt => "encrypt",
            Action::Decrypt => "decrypt",
            Action::Save => "save",
            Action::Load => "load",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown action '{s}'"))
    }
}
