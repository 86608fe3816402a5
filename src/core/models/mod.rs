pub mod action;
pub mod audit_entry;
pub mod key_backup;
pub mod key_pair;
pub mod key_source;
pub mod keygen;
pub mod verification;
