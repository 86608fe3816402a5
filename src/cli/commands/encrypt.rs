use crate::cli::commands::{audit_helpers, session};
use crate::cli::{context, output};
use crate::core::errors::Result;
use crate::core::models::action::Action;

/// Execute the `pgpdesk encrypt` command.
///
/// Encrypts to `--public-key` when given, otherwise to the saved key pair.
/// Prints the armored ciphertext on stdout.
pub fn execute(file: Option<&str>, public_key: Option<&str>) -> Result<()> {
    let config = context::load_config()?;
    let source = session::key_source(public_key)?;
    let message = session::read_input(file)?;

    session::block_on(async {
        let mut session = session::new_session();
        if !source.is_custom() {
            session::load_keys(&mut session, &config).await?;
        }

        let pb = output::spinner("Encrypting message...");
        let result = session.encrypt(&message, &source).await;
        output::finish_spinner(pb);

        let detail = source.is_custom().then(|| "custom public key".to_string());
        audit_helpers::log_result(
            &config,
            Action::Encrypt,
            session::key_id(&session),
            &result,
            detail,
        );
        let ciphertext = result?;

        output::success("Message encrypted");
        output::artifact(&ciphertext);
        Ok(())
    })
}
