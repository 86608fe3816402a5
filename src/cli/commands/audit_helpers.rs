use std::path::Path;

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::adapters::audit::json_audit_logger::JsonAuditLogger;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::{DeskError, Result};
use crate::core::models::action::Action;
use crate::core::models::audit_entry::{AuditEntry, Outcome};
use crate::core::traits::audit::AuditLogger;

/// Record a journal entry. Warns on failure instead of propagating the
/// error: journaling never blocks the main operation.
pub fn log_event(
    config: &AppConfig,
    action: Action,
    outcome: Outcome,
    key_id: Option<String>,
    detail: Option<String>,
    state_hash: Option<String>,
) {
    if !config.audit.enabled {
        return;
    }

    let logger = JsonAuditLogger::from_config(Path::new("."), &config.audit);
    let entry = AuditEntry {
        timestamp: Utc::now(),
        action,
        outcome,
        key_id,
        detail,
        state_hash,
    };

    if let Err(e) = logger.log_event(&entry) {
        output::warning(&format!("Could not write activity journal: {e}"));
    }
}

/// Record the outcome of an orchestrated operation.
pub fn log_result<T>(
    config: &AppConfig,
    action: Action,
    key_id: Option<String>,
    result: &Result<T>,
    success_detail: Option<String>,
) {
    match result {
        Ok(_) => log_event(config, action, Outcome::Success, key_id, success_detail, None),
        Err(e) => log_event(
            config,
            action,
            Outcome::from(e),
            key_id,
            Some(first_line(e)),
            None,
        ),
    }
}

/// SHA-256 of written content, hex encoded.
pub fn state_hash(contents: &str) -> String {
    format!("{:x}", Sha256::digest(contents.as_bytes()))
}

fn first_line(e: &DeskError) -> String {
    e.to_string().lines().next().unwrap_or_default().to_string()
}
