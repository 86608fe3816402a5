pub mod commands;
pub mod context;
pub mod output;

use clap::{Args, Parser, Subcommand};

use crate::core::models::action::Action;
use crate::core::models::keygen::KeyAlgorithm;

/// PGP workbench: generate, sign, verify, encrypt and decrypt.
#[derive(Parser, Debug)]
#[command(name = "pgpdesk", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to alternative config file
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Key pair backup file (default: storage.backup_file, pgp-keypair.json)
    #[arg(long, global = true)]
    pub keys: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors and the produced output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a new key pair and save it as a backup file
    Generate(GenerateArgs),

    /// Sign a message with the saved private key
    Sign {
        /// Read the message from this file instead of stdin
        #[arg(long)]
        file: Option<String>,

        /// Passphrase protecting the private key
        #[arg(long, env = "PGPDESK_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,
    },

    /// Verify an inline-signed message
    Verify {
        /// Read the signed message from this file instead of stdin
        #[arg(long)]
        file: Option<String>,

        /// Verify against this armored public key instead of the saved one
        #[arg(long)]
        public_key: Option<String>,
    },

    /// Encrypt a message to a public key
    Encrypt {
        /// Read the message from this file instead of stdin
        #[arg(long)]
        file: Option<String>,

        /// Encrypt to this armored public key instead of the saved one
        #[arg(long)]
        public_key: Option<String>,
    },

    /// Decrypt a message with the saved private key
    Decrypt {
        /// Read the encrypted message from this file instead of stdin
        #[arg(long)]
        file: Option<String>,

        /// Passphrase protecting the private key
        #[arg(long, env = "PGPDESK_PASSPHRASE", hide_env_values = true)]
        passphrase: Option<String>,
    },

    /// Show metadata of the saved key pair
    Inspect,

    /// Show the activity journal
    History {
        /// Only show entries for this action (generate, sign, verify, ...)
        #[arg(long)]
        action: Option<Action>,

        /// Show entries since this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<String>,

        /// Show only the last N entries
        #[arg(long)]
        last: Option<usize>,
    },
}

/// Options for `pgpdesk generate`. Unset options fall back to `[keygen]`.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Your name
    #[arg(long)]
    pub name: Option<String>,

    /// Your email address
    #[arg(long)]
    pub email: Option<String>,

    /// Passphrase protecting the new private key (at least 8 characters)
    #[arg(long, env = "PGPDESK_PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    /// Key algorithm: ecc, rsa2048 or rsa4096
    #[arg(long)]
    pub algorithm: Option<KeyAlgorithm>,

    /// Seconds until the key expires, 0 for never
    #[arg(long)]
    pub expires: Option<u64>,

    /// Do not add a signing subkey
    #[arg(long)]
    pub no_sign: bool,

    /// Do not add an encryption subkey
    #[arg(long)]
    pub no_encrypt: bool,

    /// Do not request certification usage
    #[arg(long)]
    pub no_certify: bool,

    /// Comment added to the user id
    #[arg(long)]
    pub comment: Option<String>,

    /// Write the backup here instead of the configured backup file
    #[arg(long)]
    pub out: Option<String>,
}
