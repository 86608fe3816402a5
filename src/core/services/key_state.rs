use crate::core::models::key_pair::KeyPair;
use crate::core::traits::key_observer::KeyObserver;

/// Holds at most one key pair and tells observers when it changes.
///
/// Starts empty. Once a key pair is set the state stays ready; later sets
/// overwrite the previous pair without confirmation.
#[derive(Default)]
pub struct KeyState {
    current: Option<KeyPair>,
    observers: Vec<Box<dyn KeyObserver>>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Box<dyn KeyObserver>) {
        self.observers.push(observer);
    }

    pub fn get(&self) -> Option<&KeyPair> {
        self.current.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.current.is_some()
    }

    /// Replace the held key pair and notify every observer.
    pub fn set(&mut self, key_pair: KeyPair) {
        let key_pair = self.current.insert(key_pair);
        for observer in &self.observers {
            observer.keys_changed(key_pair, true);
        }
    }
}

impl std::fmt::Debug for KeyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyState")
            .field("ready", &self.is_ready())
            .field("observers", &self.observers.len())
            .finish()
    }
}
