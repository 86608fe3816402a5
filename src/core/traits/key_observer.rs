use crate::core::models::key_pair::KeyPair;

/// Notified whenever the session takes hold of a new key pair.
pub trait KeyObserver: Send {
    fn keys_changed(&self, key_pair: &KeyPair, ready: bool);
}
