use std::future::Future;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use crate::adapters::provider::sequoia_provider::SequoiaProvider;
use crate::cli::commands::audit_helpers;
use crate::cli::{context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::{DeskError, Result};
use crate::core::models::action::Action;
use crate::core::models::key_backup::KeyBackup;
use crate::core::models::key_pair::KeyPair;
use crate::core::models::key_source::KeySource;
use crate::core::services::workbench::Workbench;
use crate::core::traits::key_observer::KeyObserver;

/// A workbench over the Sequoia provider, one per CLI invocation.
pub type Session = Workbench<SequoiaProvider>;

/// Reports which actions a new key pair enables.
struct ReadinessReporter;

impl KeyObserver for ReadinessReporter {
    fn keys_changed(&self, key_pair: &KeyPair, ready: bool) {
        if !ready {
            return;
        }
        let enabled: Vec<&str> = Action::ALL
            .iter()
            .filter(|a| a.requires_keys())
            .map(|a| a.as_str())
            .collect();
        output::detail(&format!(
            "Key pair {} ready: {} enabled",
            key_pair.key_id(),
            enabled.join(", ")
        ));
    }
}

pub fn new_session() -> Session {
    let mut session = Workbench::new(SequoiaProvider::new());
    session.subscribe(Box::new(ReadinessReporter));
    session
}

/// Run an async command body on a current-thread runtime.
pub fn block_on<T>(fut: impl Future<Output = Result<T>>) -> Result<T> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(fut)
}

/// Key id of the held key pair, for journal entries.
pub fn key_id(session: &Session) -> Option<String> {
    session.key_pair().map(|kp| kp.key_id().to_string())
}

/// Load the backup file into the session through the Load operation.
///
/// A missing backup file leaves the session empty so the operation itself
/// reports that no keys are available. Returns the parsed backup when one
/// was loaded.
pub async fn load_keys(session: &mut Session, config: &AppConfig) -> Result<Option<KeyBackup>> {
    let path = context::keys_path(config);
    if !path.exists() {
        output::detail(&format!("No key backup at {}", path.display()));
        return Ok(None);
    }
    let contents = read_file(&path)?;

    let result = session.load(&contents).await;
    audit_helpers::log_result(
        config,
        Action::Load,
        key_id(session),
        &result,
        Some(path.display().to_string()),
    );

    let (key_pair, backup) = result?;
    output::detail(&format!(
        "Loaded key pair {} from {} (saved {})",
        key_pair.key_id(),
        path.display(),
        backup.timestamp
    ));
    Ok(Some(backup))
}

/// Passphrase from the flag or environment, else a prompt with echo off.
///
/// Without a terminal there is nobody to prompt, and the operation reports
/// the missing passphrase itself.
pub fn resolve_passphrase(given: Option<&str>) -> Result<Option<String>> {
    if let Some(p) = given {
        return Ok(Some(p.to_string()));
    }
    if !io::stdin().is_terminal() {
        return Ok(None);
    }

    let entered = rpassword::prompt_password("  Passphrase: ")?;
    Ok(non_empty(entered))
}

/// An empty entry means no passphrase was given.
fn non_empty(entered: String) -> Option<String> {
    (!entered.is_empty()).then_some(entered)
}

/// Read command input from `--file`, or stdin when no file is given.
pub fn read_input(file: Option<&str>) -> Result<String> {
    match file {
        Some(path) => read_file(Path::new(path)),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

pub fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(DeskError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

/// `--public-key <path>` selects custom mode, otherwise the saved key pair.
pub fn key_source(public_key: Option<&str>) -> Result<KeySource> {
    match public_key {
        Some(path) => Ok(KeySource::Custom(read_file(Path::new(path))?)),
        None => Ok(KeySource::Generated),
    }
}
