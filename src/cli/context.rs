use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::config::app_config::AppConfig;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Process-wide CLI settings, fixed once the arguments are parsed.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub verbose: bool,
    pub quiet: bool,
    /// Backup file given with `--keys`.
    pub keys: Option<PathBuf>,
    /// Config file given with `--config`.
    pub config: Option<PathBuf>,
}

/// Initialize the global settings. Later calls are ignored.
pub fn init(settings: Settings) {
    let _ = SETTINGS.set(settings);
}

fn settings() -> Option<&'static Settings> {
    SETTINGS.get()
}

pub fn is_verbose() -> bool {
    settings().is_some_and(|s| s.verbose)
}

pub fn is_quiet() -> bool {
    settings().is_some_and(|s| s.quiet)
}

pub fn config_path() -> Option<&'static Path> {
    settings().and_then(|s| s.config.as_deref())
}

/// Load the configuration selected by `--config` or the default lookup.
pub fn load_config() -> crate::core::errors::Result<AppConfig> {
    AppConfig::load(config_path())
}

/// Key backup file: `--keys` if given, else `storage.backup_file`.
pub fn keys_path(config: &AppConfig) -> PathBuf {
    settings()
        .and_then(|s| s.keys.clone())
        .unwrap_or_else(|| PathBuf::from(&config.storage.backup_file))
}
