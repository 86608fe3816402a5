/// Which public key an encrypt or verify call should use.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeySource {
    /// The public half of the key pair currently held by the session.
    #[default]
    Generated,
    /// Key text pasted by the user. Sanitized before use.
    Custom(String),
}

impl KeySource {
    pub fn is_custom(&self) -> bool {
        matches!(self, KeySource::Custom(_))
    }
}
