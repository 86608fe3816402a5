use crate::cli::commands::{audit_helpers, session};
use crate::cli::{context, output};
use crate::core::errors::Result;
use crate::core::models::action::Action;

/// Execute the `pgpdesk sign` command.
///
/// Prints the armored inline-signed message on stdout.
pub fn execute(file: Option<&str>, passphrase: Option<&str>) -> Result<()> {
    let config = context::load_config()?;
    let passphrase = session::resolve_passphrase(passphrase)?;
    let message = session::read_input(file)?;

    session::block_on(async {
        let mut session = session::new_session();
        session::load_keys(&mut session, &config).await?;
        if let Some(p) = passphrase {
            session.set_passphrase(p);
        }

        let pb = output::spinner("Signing message...");
        let result = session.sign(&message).await;
        output::finish_spinner(pb);

        let key_id = session::key_id(&session);
        audit_helpers::log_result(&config, Action::Sign, key_id.clone(), &result, None);
        let signed = result?;

        output::success(&format!(
            "Message signed with key {}",
            key_id.unwrap_or_default()
        ));
        output::artifact(&signed);
        Ok(())
    })
}
