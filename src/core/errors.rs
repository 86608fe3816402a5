use std::path::PathBuf;

/// All domain errors for pgpdesk.
///
/// The first four variants are the classified outcomes of an orchestrated
/// operation. Each carries its own troubleshooting text so the CLI can print
/// the error as-is.
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("{message}")]
    Validation { message: String },

    #[error(
        "Incorrect key passphrase\n\n  \
         Troubleshooting:\n    \
         → If you loaded keys from a file, enter the passphrase those keys were generated with\n    \
         → The passphrase is cleared every time a key pair is loaded\n    \
         → Pass it again with --passphrase or PGPDESK_PASSPHRASE"
    )]
    Passphrase,

    #[error(
        "{detail}\n\n  \
         Possible issues:\n    \
         → The armored message or key block is incomplete or malformed\n    \
         → Copy/paste corruption (check for missing characters or lines)\n    \
         → The key backup file was edited by hand"
    )]
    Format { detail: String },

    #[error("{reason}")]
    Provider { reason: String },

    #[error(
        "File not found: {path}\n\n  \
         Check that the path is correct and the file exists.\n  \
         Run 'pgpdesk generate' to create a key pair backup."
    )]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error("Activity journal error: {detail}")]
    AuditError { detail: String },

    #[error(
        "This configuration uses format version {config_version}, but your pgpdesk \
         only supports up to version {supported_version}.\n\n  \
         Update pgpdesk or remove the format_version line."
    )]
    FormatVersionTooNew {
        config_version: u32,
        supported_version: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a failure, as recorded in the activity journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    Passphrase,
    Format,
    Provider,
    Environment,
}

impl DeskError {
    /// Shorthand for a failed precondition.
    pub fn validation(message: impl Into<String>) -> Self {
        DeskError::Validation {
            message: message.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            DeskError::Validation { .. } => ErrorClass::Validation,
            DeskError::Passphrase => ErrorClass::Passphrase,
            DeskError::Format { .. } => ErrorClass::Format,
            DeskError::Provider { .. } => ErrorClass::Provider,
            _ => ErrorClass::Environment,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DeskError>;
