use crate::core::errors::Result;
use crate::core::models::action::Action;
use crate::core::models::audit_entry::AuditEntry;

/// Port for recording and querying the activity journal.
pub trait AuditLogger: Send + Sync {
    /// Append an entry to the journal.
    fn log_event(&self, entry: &AuditEntry) -> Result<()>;

    /// Query all entries, optionally filtered.
    fn query(
        &self,
        action: Option<Action>,
        since: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<Vec<AuditEntry>>;
}
