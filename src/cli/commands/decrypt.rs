use crate::cli::commands::{audit_helpers, session};
use crate::cli::{context, output};
use crate::core::errors::Result;
use crate::core::models::action::Action;

/// Execute the `pgpdesk decrypt` command.
///
/// Prints the recovered plaintext on stdout.
pub fn execute(file: Option<&str>, passphrase: Option<&str>) -> Result<()> {
    let config = context::load_config()?;
    let passphrase = session::resolve_passphrase(passphrase)?;
    let ciphertext = session::read_input(file)?;

    session::block_on(async {
        let mut session = session::new_session();
        session::load_keys(&mut session, &config).await?;
        if let Some(p) = passphrase {
            session.set_passphrase(p);
        }

        let pb = output::spinner("Decrypting message...");
        let result = session.decrypt(&ciphertext).await;
        output::finish_spinner(pb);

        audit_helpers::log_result(
            &config,
            Action::Decrypt,
            session::key_id(&session),
            &result,
            None,
        );
        let plaintext = result?;

        output::success("Message decrypted");
        output::artifact(&plaintext);
        Ok(())
    })
}
