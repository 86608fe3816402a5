use std::collections::HashSet;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use regex::Regex;
use secrecy::{ExposeSecret, SecretString};

use crate::core::errors::{DeskError, Result};
use crate::core::models::action::Action;
use crate::core::models::key_backup::{KeyBackup, KeyBackupArtifact};
use crate::core::models::key_pair::KeyPair;
use crate::core::models::key_source::KeySource;
use crate::core::models::keygen::{KeyGenConfig, KeyGenRequest, UserIdentity};
use crate::core::models::verification::VerifyReport;
use crate::core::services::key_state::KeyState;
use crate::core::services::sanitizer::sanitize;
use crate::core::traits::crypto_provider::CryptoProvider;
use crate::core::traits::key_observer::KeyObserver;

/// File name offered for a saved backup.
pub const DEFAULT_BACKUP_FILE: &str = "pgp-keypair.json";

const MIN_PASSPHRASE_LEN: usize = 8;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// One workbench session: the current key pair, the passphrase field and
/// the provider every operation goes through.
///
/// Each operation checks its preconditions in a fixed order and fails with
/// `DeskError::Validation` before touching the provider. Provider calls run
/// on tokio's blocking pool so the caller's runtime stays responsive.
/// Failed operations never change the held key pair.
///
/// An action is marked in flight for the duration of its provider call and
/// cannot be started again until that call settles.
pub struct Workbench<P: CryptoProvider> {
    provider: Arc<P>,
    keys: KeyState,
    passphrase: Option<SecretString>,
    in_flight: Mutex<HashSet<Action>>,
}

/// Marks an action busy until dropped.
pub struct InFlight<'a> {
    set: &'a Mutex<HashSet<Action>>,
    action: Action,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        lock(self.set).remove(&self.action);
    }
}

fn lock(set: &Mutex<HashSet<Action>>) -> MutexGuard<'_, HashSet<Action>> {
    set.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<P: CryptoProvider> Workbench<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
            keys: KeyState::new(),
            passphrase: None,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn subscribe(&mut self, observer: Box<dyn KeyObserver>) {
        self.keys.subscribe(observer);
    }

    pub fn key_pair(&self) -> Option<&KeyPair> {
        self.keys.get()
    }

    pub fn is_ready(&self) -> bool {
        self.keys.is_ready()
    }

    /// Actions that can currently be triggered.
    pub fn enabled_actions(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| !a.requires_keys() || self.is_ready())
            .filter(|a| !self.is_busy(*a))
            .collect()
    }

    pub fn is_busy(&self, action: Action) -> bool {
        lock(&self.in_flight).contains(&action)
    }

    /// Mark `action` as in flight, refusing a second concurrent start.
    pub fn begin(&self, action: Action) -> Result<InFlight<'_>> {
        if !lock(&self.in_flight).insert(action) {
            return Err(DeskError::validation(format!(
                "The {action} operation is already in progress"
            )));
        }
        Ok(InFlight {
            set: &self.in_flight,
            action,
        })
    }

    pub fn set_passphrase(&mut self, passphrase: impl Into<String>) {
        self.passphrase = Some(SecretString::from(passphrase.into()));
    }

    pub fn clear_passphrase(&mut self) {
        self.passphrase = None;
    }

    pub fn has_passphrase(&self) -> bool {
        self.passphrase_text().is_some()
    }

    fn passphrase_text(&self) -> Option<&str> {
        self.passphrase
            .as_ref()
            .map(|p| p.expose_secret())
            .filter(|p| !p.is_empty())
    }

    /// Generate a new key pair protected by the passphrase field.
    pub async fn generate(
        &mut self,
        identity: &UserIdentity,
        config: &KeyGenConfig,
    ) -> Result<KeyPair> {
        let name = identity.name.trim();
        let email = identity.email.trim();

        if name.is_empty() {
            return Err(DeskError::validation("Name is required"));
        }
        if email.is_empty() {
            return Err(DeskError::validation("Email is required"));
        }
        if !EMAIL_PATTERN.is_match(email) {
            return Err(DeskError::validation("Please enter a valid email address"));
        }
        let passphrase = self
            .passphrase_text()
            .ok_or_else(|| DeskError::validation("Passphrase is required"))?;
        if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
            return Err(DeskError::validation(
                "Passphrase must be at least 8 characters long",
            ));
        }
        if !config.usage.any() {
            return Err(DeskError::validation(
                "Please select at least one key usage option.",
            ));
        }

        let request = KeyGenRequest {
            identity: UserIdentity {
                name: name.to_string(),
                email: email.to_string(),
            },
            passphrase: passphrase.to_string(),
            config: KeyGenConfig {
                comment: config.comment.trim().to_string(),
                ..config.clone()
            },
        };

        let key_pair = self
            .run(Action::Generate, move |provider| {
                provider.generate_key_pair(&request)
            })
            .await?;
        self.keys.set(key_pair.clone());
        Ok(key_pair)
    }

    /// Sign `message` verbatim with the held private key.
    pub async fn sign(&self, message: &str) -> Result<String> {
        if message.is_empty() {
            return Err(DeskError::validation("Please enter a message to sign"));
        }
        let private_key = self.private_key()?;
        let passphrase = self
            .passphrase_text()
            .ok_or_else(|| DeskError::validation("Passphrase is required to sign"))?
            .to_string();

        let message = message.to_string();
        self.run(Action::Sign, move |provider| {
            provider.sign(&message, &private_key, &passphrase)
        })
        .await
    }

    /// Verify an inline-signed message.
    ///
    /// A report with `is_valid == false` is returned as `Ok`: the message was
    /// read but none of its signatures checked out. Unreadable input is an
    /// error.
    pub async fn verify(&self, signed_message: &str, source: &KeySource) -> Result<VerifyReport> {
        let signed_message = signed_message.trim();
        if signed_message.is_empty() {
            return Err(DeskError::validation(
                "Please enter a signed message to verify",
            ));
        }
        let public_key = self.public_key_for(source)?;

        let signed_message = signed_message.to_string();
        self.run(Action::Verify, move |provider| {
            provider.verify(&signed_message, &public_key)
        })
        .await
    }

    /// Encrypt `message` verbatim to the selected public key.
    pub async fn encrypt(&self, message: &str, source: &KeySource) -> Result<String> {
        if message.is_empty() {
            return Err(DeskError::validation("Please enter a message to encrypt"));
        }
        let public_key = self.public_key_for(source)?;

        let message = message.to_string();
        self.run(Action::Encrypt, move |provider| {
            provider.encrypt(&message, &public_key)
        })
        .await
    }

    /// Decrypt an armored message with the held private key.
    pub async fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let ciphertext = ciphertext.trim();
        if ciphertext.is_empty() {
            return Err(DeskError::validation(
                "Please enter an encrypted message to decrypt",
            ));
        }
        let private_key = self.private_key()?;
        let passphrase = self
            .passphrase_text()
            .ok_or_else(|| DeskError::validation("Passphrase is required to decrypt"))?
            .to_string();

        let ciphertext = ciphertext.to_string();
        self.run(Action::Decrypt, move |provider| {
            provider.decrypt(&ciphertext, &private_key, &passphrase)
        })
        .await
    }

    /// Serialize the held key pair into a backup document.
    pub fn save(&self) -> Result<KeyBackupArtifact> {
        let key_pair = self
            .keys
            .get()
            .ok_or_else(|| DeskError::validation("No key pair to save. Generate keys first."))?;

        let backup = KeyBackup::new(key_pair.public_key(), key_pair.private_key());
        Ok(KeyBackupArtifact {
            file_name: DEFAULT_BACKUP_FILE.to_string(),
            contents: backup.to_json()?,
        })
    }

    /// Replace the held key pair with one read from backup contents.
    ///
    /// The passphrase field is cleared: a loaded key pair may have been
    /// generated with a different passphrase.
    pub async fn load(&mut self, contents: &str) -> Result<(KeyPair, KeyBackup)> {
        let backup = KeyBackup::parse(contents)?;

        let public_key = backup.public_key.clone();
        let private_key = backup.private_key.clone();
        let metadata = self
            .run(Action::Load, move |provider| {
                provider.inspect(&private_key)?;
                provider.inspect(&public_key)
            })
            .await?;

        let key_pair = KeyPair::new(
            backup.public_key.clone(),
            backup.private_key.clone(),
            Some(metadata),
        );
        self.keys.set(key_pair.clone());
        self.clear_passphrase();
        Ok((key_pair, backup))
    }

    fn private_key(&self) -> Result<String> {
        self.keys
            .get()
            .map(|kp| kp.private_key())
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .ok_or_else(|| DeskError::validation("Private key not available. Generate keys first."))
    }

    fn public_key_for(&self, source: &KeySource) -> Result<String> {
        match source {
            KeySource::Custom(raw) => {
                let key = sanitize(raw);
                if key.is_empty() {
                    return Err(DeskError::validation(
                        "Please enter a custom public key or switch to use the generated key.",
                    ));
                }
                Ok(key)
            }
            KeySource::Generated => self
                .keys
                .get()
                .map(|kp| kp.public_key())
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    DeskError::validation(
                        "Generated public key not available. Generate keys first or provide a custom key.",
                    )
                }),
        }
    }

    /// Run a provider call for `action` on the blocking pool.
    async fn run<T, F>(&self, action: Action, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&P) -> Result<T> + Send + 'static,
    {
        let _guard = self.begin(action)?;
        let provider = Arc::clone(&self.provider);
        tokio::task::spawn_blocking(move || job(&provider))
            .await
            .map_err(|e| DeskError::Provider {
                reason: format!("Provider task failed: {e}"),
            })?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::core::models::key_pair::KeyMetadata;
    use crate::core::models::keygen::KeyUsage;
    use crate::core::models::verification::VerificationDetail;

    /// Provider double that records calls and echoes its inputs.
    #[derive(Default)]
    struct FakeProvider {
        calls: AtomicUsize,
        last_public_key: Mutex<Option<String>>,
        last_user_id: Mutex<Option<String>>,
        reject_passphrase: bool,
    }

    impl FakeProvider {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn tick(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn check_passphrase(&self) -> Result<()> {
            if self.reject_passphrase {
                Err(DeskError::Passphrase)
            } else {
                Ok(())
            }
        }
    }

    fn metadata() -> KeyMetadata {
        KeyMetadata {
            key_id: "0123456789ABCDEF".into(),
            fingerprint: "00112233445566778899aabbccddeeff01234567".into(),
            algorithm: "ECC".into(),
            created: chrono::Utc::now(),
            user_ids: vec!["Alice <alice@example.com>".into()],
        }
    }

    impl CryptoProvider for FakeProvider {
        fn generate_key_pair(&self, request: &KeyGenRequest) -> Result<KeyPair> {
            self.tick();
            *self.last_user_id.lock().unwrap() =
                Some(request.identity.user_id(&request.config.comment));
            Ok(KeyPair::new(
                format!("PUBLIC {}", request.identity.email),
                format!("PRIVATE {}", request.identity.email),
                Some(metadata()),
            ))
        }

        fn sign(&self, message: &str, _private_key: &str, _passphrase: &str) -> Result<String> {
            self.tick();
            self.check_passphrase()?;
            Ok(format!("SIGNED[{message}]"))
        }

        fn verify(&self, signed_message: &str, public_key: &str) -> Result<VerifyReport> {
            self.tick();
            *self.last_public_key.lock().unwrap() = Some(public_key.to_string());
            let message = signed_message
                .strip_prefix("SIGNED[")
                .and_then(|m| m.strip_suffix(']'))
                .unwrap_or(signed_message)
                .to_string();
            let detail = if signed_message.starts_with("SIGNED[") {
                VerificationDetail::valid("0123456789ABCDEF")
            } else {
                VerificationDetail::invalid("0123456789ABCDEF", "bad signature")
            };
            Ok(VerifyReport::from_details(message, vec![detail]))
        }

        fn encrypt(&self, message: &str, public_key: &str) -> Result<String> {
            self.tick();
            *self.last_public_key.lock().unwrap() = Some(public_key.to_string());
            Ok(format!("ENC[{message}]"))
        }

        fn decrypt(&self, ciphertext: &str, _private_key: &str, _passphrase: &str) -> Result<String> {
            self.tick();
            self.check_passphrase()?;
            Ok(ciphertext
                .strip_prefix("ENC[")
                .and_then(|m| m.strip_suffix(']'))
                .unwrap_or(ciphertext)
                .to_string())
        }

        fn inspect(&self, key: &str) -> Result<KeyMetadata> {
            self.tick();
            if key.starts_with("PUBLIC") || key.starts_with("PRIVATE") {
                Ok(metadata())
            } else {
                Err(DeskError::Format {
                    detail: "Error reading key".into(),
                })
            }
        }
    }

    fn alice() -> UserIdentity {
        UserIdentity {
            name: "Alice".into(),
            email: "alice@example.com".into(),
        }
    }

    fn bench() -> Workbench<FakeProvider> {
        Workbench::new(FakeProvider::default())
    }

    async fn ready_bench() -> Workbench<FakeProvider> {
        let mut wb = bench();
        wb.set_passphrase("longenough1");
        wb.generate(&alice(), &KeyGenConfig::default()).await.unwrap();
        wb
    }

    fn validation_message(err: DeskError) -> String {
        match err {
            DeskError::Validation { message } => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_moves_empty_to_ready() {
        let mut wb = bench();
        assert!(!wb.is_ready());
        wb.set_passphrase("longenough1");

        let kp = wb.generate(&alice(), &KeyGenConfig::default()).await.unwrap();

        assert!(wb.is_ready());
        assert_eq!(wb.key_pair(), Some(&kp));
        assert_eq!(wb.provider().calls(), 1);
        assert!(wb.has_passphrase());
    }

    #[tokio::test]
    async fn generate_short_passphrase_never_calls_provider() {
        let mut wb = bench();
        wb.set_passphrase("1234567");

        let err = wb
            .generate(&alice(), &KeyGenConfig::default())
            .await
            .unwrap_err();

        assert_eq!(
            validation_message(err),
            "Passphrase must be at least 8 characters long"
        );
        assert_eq!(wb.provider().calls(), 0);
        assert!(!wb.is_ready());
    }

    #[tokio::test]
    async fn generate_validation_precedence() {
        let cases: [(&str, &str, Option<&str>, &str); 6] = [
            ("", "", None, "Name is required"),
            ("  ", "bad", None, "Name is required"),
            ("Alice", " ", None, "Email is required"),
            ("Alice", "alice@example", None, "Please enter a valid email address"),
            ("Alice", "alice@example.com", None, "Passphrase is required"),
            ("Alice", "alice@example.com", Some("short"), "Passphrase must be at least 8 characters long"),
        ];

        for (name, email, passphrase, expected) in cases {
            let mut wb = bench();
            if let Some(p) = passphrase {
                wb.set_passphrase(p);
            }
            let identity = UserIdentity {
                name: name.into(),
                email: email.into(),
            };
            let err = wb
                .generate(&identity, &KeyGenConfig::default())
                .await
                .unwrap_err();
            assert_eq!(validation_message(err), expected, "case {name:?}/{email:?}");
            assert_eq!(wb.provider().calls(), 0);
        }
    }

    #[tokio::test]
    async fn generate_requires_a_usage_flag() {
        let mut wb = bench();
        wb.set_passphrase("longenough1");
        let config = KeyGenConfig {
            usage: KeyUsage {
                sign: false,
                encrypt: false,
                certify: false,
            },
            ..KeyGenConfig::default()
        };

        let err = wb.generate(&alice(), &config).await.unwrap_err();

        assert_eq!(
            validation_message(err),
            "Please select at least one key usage option."
        );
        assert_eq!(wb.provider().calls(), 0);
    }

    #[tokio::test]
    async fn generate_trims_identity_and_merges_comment() {
        let mut wb = bench();
        wb.set_passphrase("longenough1");
        let identity = UserIdentity {
            name: "  Alice ".into(),
            email: " alice@example.com ".into(),
        };
        let config = KeyGenConfig {
            comment: " laptop ".into(),
            ..KeyGenConfig::default()
        };

        wb.generate(&identity, &config).await.unwrap();

        assert_eq!(
            wb.provider().last_user_id.lock().unwrap().as_deref(),
            Some("Alice (laptop) <alice@example.com>")
        );
    }

    #[tokio::test]
    async fn sign_validation_precedence() {
        let mut wb = bench();
        assert_eq!(
            validation_message(wb.sign("").await.unwrap_err()),
            "Please enter a message to sign"
        );
        assert_eq!(
            validation_message(wb.sign("hello").await.unwrap_err()),
            "Private key not available. Generate keys first."
        );

        wb.set_passphrase("longenough1");
        wb.generate(&alice(), &KeyGenConfig::default()).await.unwrap();
        wb.clear_passphrase();
        assert_eq!(
            validation_message(wb.sign("hello").await.unwrap_err()),
            "Passphrase is required to sign"
        );
        assert_eq!(wb.provider().calls(), 1);
    }

    #[tokio::test]
    async fn sign_passes_message_verbatim() {
        let wb = ready_bench().await;
        let signed = wb.sign("  spaced\r\n").await.unwrap();
        assert_eq!(signed, "SIGNED[  spaced\r\n]");
    }

    #[tokio::test]
    async fn sign_surfaces_passphrase_error() {
        let mut wb = Workbench::new(FakeProvider {
            reject_passphrase: true,
            ..FakeProvider::default()
        });
        wb.set_passphrase("longenough1");
        wb.generate(&alice(), &KeyGenConfig::default()).await.unwrap();

        let err = wb.sign("hello").await.unwrap_err();
        assert!(matches!(err, DeskError::Passphrase));
    }

    #[tokio::test]
    async fn verify_validation_precedence() {
        let wb = bench();
        assert_eq!(
            validation_message(wb.verify("  \n", &KeySource::Generated).await.unwrap_err()),
            "Please enter a signed message to verify"
        );
        assert_eq!(
            validation_message(
                wb.verify("SIGNED[x]", &KeySource::Custom("\u{200B} \r\n".into()))
                    .await
                    .unwrap_err()
            ),
            "Please enter a custom public key or switch to use the generated key."
        );
        assert_eq!(
            validation_message(wb.verify("SIGNED[x]", &KeySource::Generated).await.unwrap_err()),
            "Generated public key not available. Generate keys first or provide a custom key."
        );
        assert_eq!(wb.provider().calls(), 0);
    }

    #[tokio::test]
    async fn verify_with_custom_key_works_without_keys_and_sanitizes() {
        let wb = bench();
        let report = wb
            .verify(
                "SIGNED[hi]",
                &KeySource::Custom("\u{FEFF} KEY\r\nBODY \u{200B}".into()),
            )
            .await
            .unwrap();

        assert!(report.is_valid);
        assert_eq!(report.original_message, "hi");
        assert_eq!(
            wb.provider().last_public_key.lock().unwrap().as_deref(),
            Some("KEY\nBODY")
        );
    }

    #[tokio::test]
    async fn verify_invalid_is_an_outcome_not_an_error() {
        let wb = ready_bench().await;
        let report = wb.verify("tampered", &KeySource::Generated).await.unwrap();
        assert!(!report.is_valid);
        assert_eq!(report.details.len(), 1);
        assert!(!report.details[0].valid);
    }

    #[tokio::test]
    async fn encrypt_validation_precedence() {
        let wb = bench();
        assert_eq!(
            validation_message(wb.encrypt("", &KeySource::Custom("KEY".into())).await.unwrap_err()),
            "Please enter a message to encrypt"
        );
        assert_eq!(
            validation_message(wb.encrypt("hi", &KeySource::Custom("   ".into())).await.unwrap_err()),
            "Please enter a custom public key or switch to use the generated key."
        );
        assert_eq!(
            validation_message(wb.encrypt("hi", &KeySource::Generated).await.unwrap_err()),
            "Generated public key not available. Generate keys first or provide a custom key."
        );
        assert_eq!(wb.provider().calls(), 0);
    }

    #[tokio::test]
    async fn encrypt_uses_generated_public_key() {
        let wb = ready_bench().await;
        let ciphertext = wb.encrypt("hi", &KeySource::Generated).await.unwrap();
        assert_eq!(ciphertext, "ENC[hi]");
        assert_eq!(
            wb.provider().last_public_key.lock().unwrap().as_deref(),
            Some("PUBLIC alice@example.com")
        );
    }

    #[tokio::test]
    async fn decrypt_validation_precedence() {
        let mut wb = bench();
        assert_eq!(
            validation_message(wb.decrypt(" \n ").await.unwrap_err()),
            "Please enter an encrypted message to decrypt"
        );
        assert_eq!(
            validation_message(wb.decrypt("ENC[x]").await.unwrap_err()),
            "Private key not available. Generate keys first."
        );
        wb.set_passphrase("longenough1");
        wb.generate(&alice(), &KeyGenConfig::default()).await.unwrap();
        wb.set_passphrase("");
        assert_eq!(
            validation_message(wb.decrypt("ENC[x]").await.unwrap_err()),
            "Passphrase is required to decrypt"
        );
    }

    #[tokio::test]
    async fn decrypt_trims_ciphertext() {
        let wb = ready_bench().await;
        assert_eq!(wb.decrypt("\n ENC[hello] \n").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn save_requires_keys() {
        let wb = bench();
        assert_eq!(
            validation_message(wb.save().unwrap_err()),
            "No key pair to save. Generate keys first."
        );
    }

    #[tokio::test]
    async fn save_then_load_round_trip() {
        let wb = ready_bench().await;
        let artifact = wb.save().unwrap();
        assert_eq!(artifact.file_name, DEFAULT_BACKUP_FILE);

        let mut other = bench();
        other.set_passphrase("something else");
        let (loaded, backup) = other.load(&artifact.contents).await.unwrap();

        let original = wb.key_pair().unwrap();
        assert_eq!(loaded.public_key(), original.public_key());
        assert_eq!(loaded.private_key(), original.private_key());
        assert_eq!(backup.version, "1.0");
        assert!(other.is_ready());
    }

    #[tokio::test]
    async fn load_clears_passphrase() {
        let wb = ready_bench().await;
        let artifact = wb.save().unwrap();

        let mut other = bench();
        other.set_passphrase("longenough1");
        other.load(&artifact.contents).await.unwrap();

        assert!(!other.has_passphrase());
        assert_eq!(
            validation_message(other.sign("hello").await.unwrap_err()),
            "Passphrase is required to sign"
        );
    }

    #[tokio::test]
    async fn load_rejects_missing_fields_without_touching_state() {
        let mut wb = bench();
        let err = wb.load(r#"{"foo": 1}"#).await.unwrap_err();
        assert!(matches!(err, DeskError::Format { .. }));
        assert!(!wb.is_ready());
        assert_eq!(wb.provider().calls(), 0);
    }

    #[tokio::test]
    async fn load_rejects_unreadable_keys_and_keeps_previous_pair() {
        let mut wb = ready_bench().await;
        let before = wb.key_pair().cloned();

        let err = wb
            .load(r#"{"publicKey": "garbage", "privateKey": "garbage"}"#)
            .await
            .unwrap_err();

        assert!(matches!(err, DeskError::Format { .. }));
        assert_eq!(wb.key_pair().cloned(), before);
        assert!(wb.has_passphrase());
    }

    #[test]
    fn in_flight_action_refuses_second_start() {
        let wb = bench();
        let guard = wb.begin(Action::Sign).unwrap();
        assert!(wb.is_busy(Action::Sign));
        assert!(!wb.is_busy(Action::Encrypt));
        assert!(wb.begin(Action::Sign).is_err());
        assert!(!wb.enabled_actions().contains(&Action::Sign));

        drop(guard);
        assert!(!wb.is_busy(Action::Sign));
        assert!(wb.begin(Action::Sign).is_ok());
    }

    #[tokio::test]
    async fn failed_call_clears_in_flight_mark() {
        let mut wb = Workbench::new(FakeProvider {
            reject_passphrase: true,
            ..FakeProvider::default()
        });
        wb.set_passphrase("longenough1");
        wb.generate(&alice(), &KeyGenConfig::default()).await.unwrap();

        assert!(wb.decrypt("ENC[x]").await.is_err());
        assert!(!wb.is_busy(Action::Decrypt));
    }

    #[tokio::test]
    async fn enabled_actions_follow_readiness() {
        let mut wb = bench();
        assert_eq!(wb.enabled_actions(), vec![Action::Generate, Action::Load]);

        wb.set_passphrase("longenough1");
        wb.generate(&alice(), &KeyGenConfig::default()).await.unwrap();
        assert_eq!(wb.enabled_actions(), Action::ALL.to_vec());
    }
}
