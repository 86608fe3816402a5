//! pgpdesk: a PGP workbench for generating keys, signing, verifying,
//! encrypting and decrypting messages, and saving key pair backups.
//!
//! Cryptography is delegated to a
//! [`CryptoProvider`](core::traits::crypto_provider::CryptoProvider). The
//! [`Workbench`](core::services::workbench::Workbench) holds the session
//! state and validates every operation before the provider sees it.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
