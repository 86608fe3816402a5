use chrono::{DateTime, Utc};

/// Descriptive data about a key, derived from its public part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMetadata {
    /// Upper-case hex key id.
    pub key_id: String,
    /// Hex fingerprint, no separators.
    pub fingerprint: String,
    pub algorithm: String,
    pub created: DateTime<Utc>,
    pub user_ids: Vec<String>,
}

impl KeyMetadata {
    /// Fingerprint split into upper-case groups of four, e.g. `ABCD 1234 ...`.
    pub fn formatted_fingerprint(&self) -> String {
        format_fingerprint(&self.fingerprint)
    }
}

/// Group a hex fingerprint in blocks of four characters.
pub fn format_fingerprint(fingerprint: &str) -> String {
    fingerprint
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<Vec<_>>()
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>().to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// An armored OpenPGP key pair.
///
/// Never mutated after construction: replacing the whole value in
/// `KeyState` is the only way to change the current keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    public_key: String,
    private_key: String,
    metadata: Option<KeyMetadata>,
}

impl KeyPair {
    pub fn new(public_key: String, private_key: String, metadata: Option<KeyMetadata>) -> Self {
        Self {
            public_key,
            private_key,
            metadata,
        }
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    pub fn metadata(&self) -> Option<&KeyMetadata> {
        self.metadata.as_ref()
    }

    /// Key id for display, or `"unknown"` when no metadata is attached.
    pub fn key_id(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|m| m.key_id.as_str())
            .unwrap_or("unknown")
    }
}
