use std::path::PathBuf;

use crate::cli::commands::{audit_helpers, session};
use crate::cli::{GenerateArgs, context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::action::Action;
use crate::core::models::audit_entry::Outcome;
use crate::core::models::key_pair::KeyPair;
use crate::core::models::keygen::{KeyGenConfig, UserIdentity};

/// Execute the `pgpdesk generate` command.
///
/// Generates a key pair and immediately saves it as a backup file, since a
/// CLI session does not outlive the command.
pub fn execute(args: &GenerateArgs) -> Result<()> {
    let config = context::load_config()?;
    let keygen = keygen_config(args, &config);
    let identity = UserIdentity {
        name: args.name.clone().unwrap_or_default(),
        email: args.email.clone().unwrap_or_default(),
    };
    let passphrase = session::resolve_passphrase(args.passphrase.as_deref())?;
    let out = args
        .out
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| context::keys_path(&config));

    session::block_on(async {
        let mut session = session::new_session();
        if let Some(p) = passphrase {
            session.set_passphrase(p);
        }

        output::header("pgpdesk generate");
        let pb = output::spinner(&format!("Generating {} key pair...", keygen.algorithm));
        let result = session.generate(&identity, &keygen).await;
        output::finish_spinner(pb);

        audit_helpers::log_result(
            &config,
            Action::Generate,
            session::key_id(&session),
            &result,
            Some(format!("{}, {}", keygen.algorithm, keygen.usage)),
        );
        let key_pair = result?;
        print_key_pair(&key_pair, &keygen);

        let saved = session.save();
        if saved.is_err() {
            let key_id = session::key_id(&session);
            audit_helpers::log_result(&config, Action::Save, key_id, &saved, None);
        }
        let artifact = saved?;

        std::fs::write(&out, &artifact.contents)?;
        audit_helpers::log_event(
            &config,
            Action::Save,
            Outcome::Success,
            session::key_id(&session),
            Some(out.display().to_string()),
            Some(audit_helpers::state_hash(&artifact.contents)),
        );

        output::success(&format!("Key pair saved to {}", out.display()));
        output::info("Keep this file safe: it holds your passphrase-protected private key.");
        Ok(())
    })
}

/// `[keygen]` defaults with command-line overrides applied.
fn keygen_config(args: &GenerateArgs, config: &AppConfig) -> KeyGenConfig {
    let mut keygen = config.keygen.to_keygen_config();
    if let Some(algorithm) = args.algorithm {
        keygen.algorithm = algorithm;
    }
    if let Some(expires) = args.expires {
        keygen.expiration_secs = expires;
    }
    if let Some(comment) = &args.comment {
        keygen.comment = comment.clone();
    }
    keygen.usage.sign &= !args.no_sign;
    keygen.usage.encrypt &= !args.no_encrypt;
    keygen.usage.certify &= !args.no_certify;
    keygen
}

fn print_key_pair(key_pair: &KeyPair, keygen: &KeyGenConfig) {
    output::success("Key pair generated");
    if let Some(meta) = key_pair.metadata() {
        output::info(&format!("Key ID:      {}", meta.key_id));
        output::info(&format!("Fingerprint: {}", meta.formatted_fingerprint()));
        output::info(&format!("Algorithm:   {}", keygen.algorithm));
        output::info(&format!("Usage:       {}", keygen.usage));
        output::info(&format!("Expires:     {}", keygen.expiration_label()));
        for uid in &meta.user_ids {
            output::info(&format!("User ID:     {uid}"));
        }
    }
    output::detail(&format!("Public key:\n{}", key_pair.public_key()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::keygen::KeyAlgorithm;

    #[test]
    fn flags_override_config_defaults() {
        let config = AppConfig::parse("[keygen]\ncomment = \"from config\"\n").unwrap();
        let args = GenerateArgs {
            algorithm: Some(KeyAlgorithm::Rsa2048),
            expires: Some(0),
            no_encrypt: true,
            ..GenerateArgs::default()
        };

        let keygen = keygen_config(&args, &config);

        assert_eq!(keygen.algorithm, KeyAlgorithm::Rsa2048);
        assert_eq!(keygen.expiration_secs, 0);
        assert_eq!(keygen.comment, "from config");
        assert!(keygen.usage.sign);
        assert!(!keygen.usage.encrypt);
        assert!(keygen.usage.certify);
    }

    #[test]
    fn no_flags_keep_config() {
        let config = AppConfig::parse("[keygen]\nsign = false\n").unwrap();
        let keygen = keygen_config(&GenerateArgs::default(), &config);
        assert!(!keygen.usage.sign);
        assert_eq!(keygen.algorithm, KeyAlgorithm::Ecc);
    }
}
