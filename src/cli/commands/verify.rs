use crate::cli::commands::{audit_helpers, session};
use crate::cli::{context, output};
use crate::core::errors::Result;
use crate::core::models::action::Action;
use crate::core::models::audit_entry::Outcome;
use crate::core::models::verification::VerifyReport;

/// Execute the `pgpdesk verify` command.
///
/// Returns `Ok(false)` when the message was read but no signature checked
/// out; that is a failed verification, not an error. On success the
/// original message is printed on stdout.
pub fn execute(file: Option<&str>, public_key: Option<&str>) -> Result<bool> {
    let config = context::load_config()?;
    let source = session::key_source(public_key)?;
    let signed = session::read_input(file)?;

    session::block_on(async {
        let mut session = session::new_session();
        if !source.is_custom() {
            session::load_keys(&mut session, &config).await?;
        }

        let pb = output::spinner("Verifying signature...");
        let result = session.verify(&signed, &source).await;
        output::finish_spinner(pb);

        let key_id = session::key_id(&session);
        if result.is_err() {
            audit_helpers::log_result(&config, Action::Verify, key_id.clone(), &result, None);
        }
        let report = result?;

        let outcome = if report.is_valid {
            Outcome::Success
        } else {
            Outcome::VerificationFailed
        };
        audit_helpers::log_event(
            &config,
            Action::Verify,
            outcome,
            key_id,
            Some(report.summary()),
            None,
        );

        render(&report);
        Ok(report.is_valid)
    })
}

fn render(report: &VerifyReport) {
    if report.is_valid {
        output::success("Signature verified");
        output::info(&report.summary());
        for line in report.detail_lines() {
            output::detail(&line);
        }
        output::artifact(&report.original_message);
        return;
    }

    output::error("Signature verification failed");
    if report.details.is_empty() {
        output::info("The message carries no signatures.");
        output::info("Check that the complete signed message was given, armor lines included.");
        return;
    }
    output::info(&report.summary());
    for line in report.detail_lines() {
        output::info(&line);
    }
    output::info("The message may have been altered, or it was signed by a different key.");
}
