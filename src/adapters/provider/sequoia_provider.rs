use std::fmt::Display;
use std::io::{Read, Write};
use std::time::Duration;

use chrono::{DateTime, Utc};
use openpgp::armor::{Kind as ArmorKind, Writer as ArmorWriter};
use openpgp::cert::prelude::*;
use openpgp::crypto::{Password, SessionKey};
use openpgp::packet::key::{SecretParts, UnspecifiedRole};
use openpgp::packet::{Key, PKESK, SKESK, Signature};
use openpgp::parse::Parse;
use openpgp::parse::stream::{
    DecryptionHelper, DecryptorBuilder, MessageLayer, MessageStructure, VerificationError,
    VerificationHelper, VerifierBuilder,
};
use openpgp::policy::StandardPolicy;
use openpgp::serialize::Serialize;
use openpgp::serialize::stream::{Armorer, Encryptor, LiteralWriter, Message, Recipient, Signer};
use openpgp::types::{KeyFlags, PublicKeyAlgorithm, SymmetricAlgorithm};
use openpgp::{Cert, KeyHandle, KeyID};
use sequoia_openpgp as openpgp;

use crate::core::errors::{DeskError, Result};
use crate::core::models::key_pair::{KeyMetadata, KeyPair};
use crate::core::models::keygen::{KeyAlgorithm, KeyGenRequest};
use crate::core::models::verification::{VerificationDetail, VerifyReport};
use crate::core::traits::crypto_provider::CryptoProvider;

const POLICY: &StandardPolicy = &StandardPolicy::new();

/// OpenPGP provider backed by Sequoia with its pure-Rust crypto backend.
///
/// Every method parses the armored inputs it is given; nothing is cached
/// between calls. Signed messages are inline (signature and literal data in
/// one armored `PGP MESSAGE`), not cleartext-signed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequoiaProvider;

impl SequoiaProvider {
    pub fn new() -> Self {
        Self
    }
}

impl CryptoProvider for SequoiaProvider {
    fn generate_key_pair(&self, request: &KeyGenRequest) -> Result<KeyPair> {
        let config = &request.config;
        let suite = match config.algorithm {
            KeyAlgorithm::Ecc => CipherSuite::Cv25519,
            KeyAlgorithm::Rsa2048 => CipherSuite::RSA2k,
            KeyAlgorithm::Rsa4096 => CipherSuite::RSA4k,
        };
        let validity = (config.expiration_secs > 0)
            .then(|| Duration::from_secs(config.expiration_secs));

        // The primary key always certifies so it can bind the subkeys.
        let mut builder = CertBuilder::new()
            .add_userid(request.identity.user_id(&config.comment))
            .set_cipher_suite(suite)
            .set_primary_key_flags(KeyFlags::empty().set_certification())
            .set_validity_period(validity)
            .set_password(Some(Password::from(request.passphrase.as_str())));
        if config.usage.sign {
            builder = builder.add_signing_subkey();
        }
        if config.usage.encrypt {
            builder = builder.add_transport_encryption_subkey();
        }

        let (cert, _revocation) = builder.generate().map_err(failed("Key generation failed"))?;

        let public_key = armor_cert(&cert, false)?;
        let private_key = armor_cert(&cert, true)?;
        let mut metadata = metadata_of(&cert);
        metadata.algorithm = config.algorithm.label().to_string();

        Ok(KeyPair::new(public_key, private_key, Some(metadata)))
    }

    fn sign(&self, message: &str, private_key: &str, passphrase: &str) -> Result<String> {
        let keypair = signing_keypair(private_key, passphrase)?;

        let mut sink = Vec::new();
        let writer = Message::new(&mut sink);
        let writer = Armorer::new(writer)
            .build()
            .map_err(failed("Failed to armor signed message"))?;
        let writer = Signer::new(writer, keypair)
            .map_err(failed("Failed to set up signer"))?
            .build()
            .map_err(failed("Failed to set up signer"))?;
        let mut writer = LiteralWriter::new(writer)
            .build()
            .map_err(failed("Failed to write message"))?;
        writer
            .write_all(message.as_bytes())
            .map_err(failed("Failed to write message"))?;
        writer.finalize().map_err(failed("Failed to sign message"))?;

        into_text(sink)
    }

    fn verify(&self, signed_message: &str, public_key: &str) -> Result<VerifyReport> {
        let cert = read_cert(public_key, "public key")?;
        let helper = VerifyHelper {
            certs: vec![cert],
            details: Vec::new(),
        };

        let mut verifier = VerifierBuilder::from_bytes(signed_message.as_bytes())
            .map_err(malformed("Error reading signed message"))?
            .with_policy(POLICY, None, helper)
            .map_err(malformed("Error reading signed message"))?;

        let mut content = Vec::new();
        verifier
            .read_to_end(&mut content)
            .map_err(malformed("Error reading signed message"))?;

        let helper = verifier.into_helper();
        Ok(VerifyReport::from_details(into_text(content)?, helper.details))
    }

    fn encrypt(&self, message: &str, public_key: &str) -> Result<String> {
        let cert = read_cert(public_key, "public key")?;

        let recipients: Vec<Recipient<'_>> = cert
            .keys()
            .with_policy(POLICY, None)
            .supported()
            .alive()
            .revoked(false)
            .for_transport_encryption()
            .map(|ka| ka.into())
            .collect();
        if recipients.is_empty() {
            return Err(DeskError::Provider {
                reason: "The public key has no usable encryption key".into(),
            });
        }

        let mut sink = Vec::new();
        let writer = Message::new(&mut sink);
        let writer = Armorer::new(writer)
            .build()
            .map_err(failed("Failed to armor encrypted message"))?;
        let writer = Encryptor::for_recipients(writer, recipients)
            .build()
            .map_err(failed("Failed to set up encryption"))?;
        let mut writer = LiteralWriter::new(writer)
            .build()
            .map_err(failed("Failed to write message"))?;
        writer
            .write_all(message.as_bytes())
            .map_err(failed("Failed to write message"))?;
        writer.finalize().map_err(failed("Failed to encrypt message"))?;

        into_text(sink)
    }

    fn decrypt(&self, ciphertext: &str, private_key: &str, passphrase: &str) -> Result<String> {
        let cert = read_cert(private_key, "private key")?;
        let password = Password::from(passphrase);

        // Unlock up front so a wrong passphrase is reported as such instead
        // of as an undecryptable message.
        let keypairs = cert
            .keys()
            .secret()
            .with_policy(POLICY, None)
            .supported()
            .revoked(false)
            .for_transport_encryption()
            .map(|ka| unlock(ka.key().clone(), &password))
            .collect::<Result<Vec<_>>>()?;
        if keypairs.is_empty() {
            return Err(DeskError::Provider {
                reason: "The private key has no usable decryption key".into(),
            });
        }

        let helper = DecryptHelper { keypairs };
        let mut decryptor = DecryptorBuilder::from_bytes(ciphertext.as_bytes())
            .map_err(malformed("Error reading encrypted message"))?
            .with_policy(POLICY, None, helper)
            .map_err(classify_decrypt_error)?;

        let mut plaintext = Vec::new();
        decryptor
            .read_to_end(&mut plaintext)
            .map_err(failed("Failed to decrypt message"))?;

        into_text(plaintext)
    }

    fn inspect(&self, key: &str) -> Result<KeyMetadata> {
        let cert = read_cert(key, "key")?;
        Ok(metadata_of(&cert))
    }
}

/// Collects one detail per signature and never fails the stream, so a bad
/// signature becomes a report entry rather than an error.
struct VerifyHelper {
    certs: Vec<Cert>,
    details: Vec<VerificationDetail>,
}

impl VerificationHelper for VerifyHelper {
    fn get_certs(&mut self, _ids: &[KeyHandle]) -> openpgp::Result<Vec<Cert>> {
        Ok(self.certs.clone())
    }

    fn check(&mut self, structure: MessageStructure) -> openpgp::Result<()> {
        for layer in structure.iter() {
            if let MessageLayer::SignatureGroup { results } = layer {
                for result in results {
                    let detail = match result {
                        Ok(good) => VerificationDetail::valid(good.ka.key().keyid().to_hex()),
                        Err(err) => VerificationDetail::invalid(
                            failed_signature(err)
                                .map(issuer_key_id)
                                .unwrap_or_else(|| "Unknown".to_string()),
                            err.to_string(),
                        ),
                    };
                    self.details.push(detail);
                }
            }
        }
        Ok(())
    }
}

/// Holds secret keys that were already unlocked with the passphrase.
struct DecryptHelper {
    keypairs: Vec<openpgp::crypto::KeyPair>,
}

#[derive(Debug, thiserror::Error)]
#[error("The message was not encrypted to this key")]
struct NoMatchingKey;

impl VerificationHelper for DecryptHelper {
    fn get_certs(&mut self, _ids: &[KeyHandle]) -> openpgp::Result<Vec<Cert>> {
        Ok(Vec::new())
    }

    fn check(&mut self, _structure: MessageStructure) -> openpgp::Result<()> {
        Ok(())
    }
}

impl DecryptionHelper for DecryptHelper {
    fn decrypt(
        &mut self,
        pkesks: &[PKESK],
        _skesks: &[SKESK],
        sym_algo: Option<SymmetricAlgorithm>,
        decrypt: &mut dyn FnMut(Option<SymmetricAlgorithm>, &SessionKey) -> bool,
    ) -> openpgp::Result<Option<Cert>> {
        for pkesk in pkesks {
            for keypair in &mut self.keypairs {
                if let Some((algo, sk)) = pkesk.decrypt(keypair, sym_algo) {
                    if decrypt(algo, &sk) {
                        return Ok(None);
                    }
                }
            }
        }
        Err(NoMatchingKey.into())
    }
}

fn classify_decrypt_error(err: anyhow::Error) -> DeskError {
    let wrong_key = err.downcast_ref::<NoMatchingKey>().is_some()
        || err
            .downcast_ref::<openpgp::Error>()
            .is_some_and(|e| matches!(e, openpgp::Error::MissingSessionKey(_)));
    if wrong_key {
        DeskError::Provider {
            reason: NoMatchingKey.to_string(),
        }
    } else {
        DeskError::Format {
            detail: format!("Error reading encrypted message: {err}"),
        }
    }
}

fn failed_signature<'a>(err: &VerificationError<'a>) -> Option<&'a Signature> {
    match err {
        VerificationError::MalformedSignature { sig, .. }
        | VerificationError::MissingKey { sig, .. }
        | VerificationError::UnboundKey { sig, .. }
        | VerificationError::BadKey { sig, .. }
        | VerificationError::BadSignature { sig, .. } => Some(*sig),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

fn issuer_key_id(sig: &Signature) -> String {
    match sig.get_issuers().into_iter().next() {
        Some(KeyHandle::Fingerprint(fpr)) => KeyID::from(fpr).to_hex(),
        Some(KeyHandle::KeyID(id)) => id.to_hex(),
        None => "Unknown".to_string(),
    }
}

/// The first usable signing key of an armored secret key, unlocked.
fn signing_keypair(private_key: &str, passphrase: &str) -> Result<openpgp::crypto::KeyPair> {
    let cert = read_cert(private_key, "private key")?;
    let signing_key = cert
        .keys()
        .secret()
        .with_policy(POLICY, None)
        .supported()
        .alive()
        .revoked(false)
        .for_signing()
        .next()
        .ok_or_else(|| DeskError::Provider {
            reason: "The private key has no usable signing key".into(),
        })?;
    unlock(signing_key.key().clone(), &Password::from(passphrase))
}

fn unlock(
    key: Key<SecretParts, UnspecifiedRole>,
    password: &Password,
) -> Result<openpgp::crypto::KeyPair> {
    let key = if key.secret().is_encrypted() {
        key.decrypt_secret(password)
            .map_err(|_| DeskError::Passphrase)?
    } else {
        key
    };
    key.into_keypair().map_err(failed("Failed to use secret key"))
}

fn read_cert(armored: &str, what: &str) -> Result<Cert> {
    Cert::from_bytes(armored.as_bytes()).map_err(|e| DeskError::Format {
        detail: format!("Error reading {what}: {e}"),
    })
}

fn armor_cert(cert: &Cert, secret: bool) -> Result<String> {
    let kind = if secret {
        ArmorKind::SecretKey
    } else {
        ArmorKind::PublicKey
    };
    let mut writer = ArmorWriter::new(Vec::new(), kind).map_err(failed("Failed to armor key"))?;
    if secret {
        cert.as_tsk()
            .serialize(&mut writer)
            .map_err(failed("Failed to serialize key"))?;
    } else {
        cert.serialize(&mut writer)
            .map_err(failed("Failed to serialize key"))?;
    }
    let bytes = writer.finalize().map_err(failed("Failed to armor key"))?;
    into_text(bytes)
}

fn metadata_of(cert: &Cert) -> KeyMetadata {
    let primary = cert.primary_key().key();
    KeyMetadata {
        key_id: cert.keyid().to_hex(),
        fingerprint: cert.fingerprint().to_hex(),
        algorithm: algorithm_label(primary.pk_algo(), primary.mpis().bits()),
        created: DateTime::<Utc>::from(primary.creation_time()),
        user_ids: cert
            .userids()
            .map(|ua| String::from_utf8_lossy(ua.userid().value()).into_owned())
            .collect(),
    }
}

#[allow(deprecated)]
fn algorithm_label(pk_algo: PublicKeyAlgorithm, bits: Option<usize>) -> String {
    match pk_algo {
        PublicKeyAlgorithm::RSAEncryptSign
        | PublicKeyAlgorithm::RSAEncrypt
        | PublicKeyAlgorithm::RSASign => match bits {
            Some(bits) => format!("RSA{bits}"),
            None => "RSA".to_string(),
        },
        PublicKeyAlgorithm::EdDSA | PublicKeyAlgorithm::ECDH | PublicKeyAlgorithm::ECDSA => {
            "ECC".to_string()
        }
        other => other.to_string(),
    }
}

fn into_text(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| DeskError::Format {
        detail: "Message content is not valid UTF-8 text".into(),
    })
}

fn failed<E: Display>(context: &'static str) -> impl FnOnce(E) -> DeskError {
    move |e| DeskError::Provider {
        reason: format!("{context}: {e}"),
    }
}

fn malformed<E: Display>(context: &'static str) -> impl FnOnce(E) -> DeskError {
    move |e| DeskError::Format {
        detail: format!("{context}: {e}"),
    }
}
