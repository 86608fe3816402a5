use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::config::app_config::AuditSection;
use crate::core::errors::{DeskError, Result};
use crate::core::models::action::Action;
use crate::core::models::audit_entry::AuditEntry;
use crate::core::traits::audit::AuditLogger;

/// Activity journal stored as JSON lines, one `AuditEntry` per line.
pub struct JsonAuditLogger {
    log_path: PathBuf,
}

impl JsonAuditLogger {
    /// Journal at `{base_dir}/{log_file}`. An absolute `log_file` wins.
    pub fn new(base_dir: &Path, log_file: &str) -> Self {
        Self {
            log_path: base_dir.join(log_file),
        }
    }

    pub fn from_config(base_dir: &Path, audit: &AuditSection) -> Self {
        Self::new(base_dir, &audit.log_file)
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

impl AuditLogger for JsonAuditLogger {
    fn log_event(&self, entry: &AuditEntry) -> Result<()> {
        let line = serde_json::to_string(entry).map_err(|e| DeskError::AuditError {
            detail: format!("Failed to serialize journal entry: {e}"),
        })?;

        if let Some(parent) = self.log_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| DeskError::AuditError {
                detail: format!("Cannot open journal at {}: {e}", self.log_path.display()),
            })?;

        writeln!(file, "{line}").map_err(|e| DeskError::AuditError {
            detail: format!("Failed to write journal entry: {e}"),
        })?;

        Ok(())
    }

    fn query(&self, action: Option<Action>, since: Option<DateTime<Utc>>) -> Result<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.log_path).map_err(|e| DeskError::AuditError {
            detail: format!("Cannot read journal: {e}"),
        })?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| DeskError::AuditError {
                detail: format!("Error reading journal line {}: {e}", line_num + 1),
            })?;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let entry: AuditEntry =
                serde_json::from_str(trimmed).map_err(|e| DeskError::AuditError {
                    detail: format!("Malformed journal entry at line {}: {e}", line_num + 1),
                })?;

            if action.is_some_and(|a| a != entry.action) {
                continue;
            }
            if since.is_some_and(|s| entry.timestamp < s) {
                continue;
            }

            entries.push(entry);
        }

        Ok(entries)
    }
}
