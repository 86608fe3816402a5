use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use colored::Colorize;

use crate::adapters::audit::json_audit_logger::JsonAuditLogger;
use crate::cli::{context, output};
use crate::core::errors::{DeskError, Result};
use crate::core::models::action::Action;
use crate::core::models::audit_entry::{AuditEntry, Outcome};
use crate::core::traits::audit::AuditLogger;

/// Execute the `pgpdesk history` command.
///
/// Displays the activity journal with optional filters for action, date
/// and entry count.
pub fn execute(action: Option<Action>, since: Option<&str>, last: Option<usize>) -> Result<()> {
    let config = context::load_config()?;
    let logger = JsonAuditLogger::from_config(Path::new("."), &config.audit);

    let since_dt = since.map(parse_since).transpose()?;
    let entries = logger.query(action, since_dt)?;

    if entries.is_empty() {
        output::header("pgpdesk history");
        output::warning("No journal entries found");
        if action.is_some() || since.is_some() {
            output::info("Try removing filters to see all entries.");
        }
        if !config.audit.enabled {
            output::info("The activity journal is disabled in [audit].");
        }
        return Ok(());
    }

    let shown = take_last(&entries, last);

    output::header(&format!("pgpdesk history ({} entries)", shown.len()));
    for entry in shown {
        println!("{}", format_entry(entry));
    }

    Ok(())
}

/// Parse a date (`YYYY-MM-DD`) as midnight UTC.
fn parse_since(s: &str) -> Result<DateTime<Utc>> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| DeskError::InvalidConfig {
            detail: format!(
                "Invalid date format: '{s}'. Expected ISO 8601 (YYYY-MM-DD), e.g. 2026-01-15"
            ),
        })
}

/// The last `n` entries in journal order, or all of them.
fn take_last(entries: &[AuditEntry], last: Option<usize>) -> &[AuditEntry] {
    match last {
        Some(n) => &entries[entries.len().saturating_sub(n)..],
        None => entries,
    }
}

fn format_entry(entry: &AuditEntry) -> String {
    let date = entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
    let key = entry.key_id.as_deref().unwrap_or("-");
    let detail = entry.detail.as_deref().unwrap_or("");

    format!(
        "  {} {} {:<9} {:<20} {:<16} {}",
        date.dimmed(),
        "│".dimmed(),
        entry.action.as_str(),
        format_outcome(entry.outcome),
        key,
        detail.dimmed(),
    )
}

fn format_outcome(outcome: Outcome) -> String {
    let label = match outcome {
        Outcome::Success => "ok",
        Outcome::VerificationFailed => "verification failed",
        Outcome::ValidationError => "validation error",
        Outcome::PassphraseError => "passphrase error",
        Outcome::FormatError => "format error",
        Outcome::ProviderError => "provider error",
        Outcome::EnvironmentError => "environment error",
    };
    let padded = format!("{label:<20}");
    match outcome {
        Outcome::Success => padded.green().to_string(),
        Outcome::VerificationFailed | Outcome::ValidationError => padded.yellow().to_string(),
        _ => padded.red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn entry(action: Action) -> AuditEntry {
        AuditEntry {
            timestamp: Utc::now(),
            action,
            outcome: Outcome::Success,
            key_id: None,
            detail: None,
            state_hash: None,
        }
    }

    #[test]
    fn parse_since_is_midnight_utc() {
        assert_eq!(
            parse_since("2026-01-15").unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn parse_since_rejects_other_formats() {
        assert!(parse_since("15/01/2026").is_err());
    }

    #[test]
    fn take_last_keeps_order() {
        let entries = vec![
            entry(Action::Generate),
            entry(Action::Sign),
            entry(Action::Verify),
        ];

        let last_two: Vec<Action> = take_last(&entries, Some(2))
            .iter()
            .map(|e| e.action)
            .collect();
        assert_eq!(last_two, vec![Action::Sign, Action::Verify]);
        assert_eq!(take_last(&entries, Some(10)).len(), 3);
        assert_eq!(take_last(&entries, None).len(), 3);
    }
}
