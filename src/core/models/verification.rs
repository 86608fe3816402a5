/// Outcome of checking one signature attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationDetail {
    /// Hex key id of the issuer, or `"Unknown"` when the signature names none.
    pub key_id: String,
    pub valid: bool,
    pub error: Option<String>,
}

impl VerificationDetail {
    pub fn valid(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            valid: true,
            error: None,
        }
    }

    pub fn invalid(key_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            valid: false,
            error: Some(error.into()),
        }
    }
}

/// Result of a completed verification.
///
/// `is_valid == false` is a failure outcome, not an error: the message was
/// readable but no signature checked out against the supplied key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyReport {
    pub original_message: String,
    pub is_valid: bool,
    pub details: Vec<VerificationDetail>,
}

impl VerifyReport {
    /// Build a report whose validity is derived from the details.
    pub fn from_details(original_message: String, details: Vec<VerificationDetail>) -> Self {
        let is_valid = aggregate_validity(&details);
        Self {
            original_message,
            is_valid,
            details,
        }
    }

    pub fn valid_count(&self) -> usize {
        self.details.iter().filter(|d| d.valid).count()
    }

    /// One-line tally, e.g. "2 signature(s) checked, 1 valid".
    pub fn summary(&self) -> String {
        format!(
            "{} signature(s) checked, {} valid",
            self.details.len(),
            self.valid_count()
        )
    }

    /// Numbered per-signature lines for display.
    pub fn detail_lines(&self) -> Vec<String> {
        self.details
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let status = if d.valid { "Valid" } else { "Invalid" };
                let mut line = format!("Signature {}: {status} (Key ID: {})", i + 1, d.key_id);
                if let Some(error) = &d.error {
                    line.push_str(&format!(" - Error: {error}"));
                }
                line
            })
            .collect()
    }
}

/// A message counts as verified when any one of its signatures is valid.
///
/// Multi-signed messages often carry signatures from keys the verifier
/// does not hold; those must not sink the one that matches.
pub fn aggregate_validity(details: &[VerificationDetail]) -> bool {
    details.iter().any(|d| d.valid)
}
