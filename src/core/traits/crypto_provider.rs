use crate::core::errors::Result;
use crate::core::models::key_pair::{KeyMetadata, KeyPair};
use crate::core::models::keygen::KeyGenRequest;
use crate::core::models::verification::VerifyReport;

/// Port for the OpenPGP implementation that does the actual cryptography.
///
/// Implementations live in `adapters::provider`. Orchestrators only depend
/// on this trait and run its methods on a blocking worker, so the methods
/// themselves are synchronous.
///
/// Parse failures of armored input must surface as `DeskError::Format` and
/// a passphrase that cannot unlock the secret key as `DeskError::Passphrase`.
pub trait CryptoProvider: Send + Sync + 'static {
    /// Generate a passphrase-protected key pair in armored form.
    fn generate_key_pair(&self, request: &KeyGenRequest) -> Result<KeyPair>;

    /// Produce an armored inline-signed message.
    fn sign(&self, message: &str, private_key: &str, passphrase: &str) -> Result<String>;

    /// Check every signature on an inline-signed message.
    fn verify(&self, signed_message: &str, public_key: &str) -> Result<VerifyReport>;

    /// Encrypt to the given public key, armored.
    fn encrypt(&self, message: &str, public_key: &str) -> Result<String>;

    /// Decrypt an armored message with a passphrase-protected private key.
    fn decrypt(&self, ciphertext: &str, private_key: &str, passphrase: &str) -> Result<String>;

    /// Read descriptive metadata from an armored key.
    fn inspect(&self, key: &str) -> Result<KeyMetadata>;
}
