use crate::cli::commands::session;
use crate::cli::{context, output};
use crate::core::errors::{DeskError, Result};

/// Execute the `pgpdesk inspect` command.
///
/// Loads the key backup and shows the key metadata.
pub fn execute() -> Result<()> {
    let config = context::load_config()?;

    session::block_on(async {
        let mut session = session::new_session();
        let backup = session::load_keys(&mut session, &config)
            .await?
            .ok_or_else(|| DeskError::FileNotFound {
                path: context::keys_path(&config),
            })?;

        output::header("pgpdesk inspect");
        let Some(meta) = session.key_pair().and_then(|kp| kp.metadata()) else {
            output::warning("No metadata available for this key pair");
            return Ok(());
        };

        output::info(&format!("Key ID:      {}", meta.key_id));
        output::info(&format!("Fingerprint: {}", meta.formatted_fingerprint()));
        output::info(&format!("Algorithm:   {}", meta.algorithm));
        output::info(&format!(
            "Created:     {}",
            meta.created.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        for uid in &meta.user_ids {
            output::info(&format!("User ID:     {uid}"));
        }
        output::info(&format!(
            "Backup:      saved {} (format {})",
            backup.timestamp, backup.version
        ));
        Ok(())
    })
}
