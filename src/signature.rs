use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Constant tag prefixed to every signature token.
///
/// Hex-encoded tool name followed by a dash, so a suspect token can be
/// recognized by eye (or grep) even without access to the fingerprint store.
pub const SIGNATURE_TAG: &str = "74726163656d61726b-";

/// Opaque per-recipient signature token: `SIGNATURE_TAG` + UUID v4.
///
/// Generated once per recipient per campaign and never mutated. The token is
/// plain ASCII with no comma or newline, which keeps it safe to embed in any
/// channel and to store alongside the other record fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Generate a fresh signature from OS entropy (128-bit UUID v4).
    pub fn generate() -> Self {
        Self(format!("{}{}", SIGNATURE_TAG, Uuid::new_v4()))
    }

    /// Wrap an existing token, e.g. one loaded from a store record.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Heuristic recognizer: does `text` carry the constant tag anywhere?
    pub fn has_tag(text: &str) -> bool {
        text.contains(SIGNATURE_TAG)
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_signature_has_tag() {
        let sig = Signature::generate();
        assert!(sig.as_str().starts_with(SIGNATURE_TAG));
        assert!(Signature::has_tag(sig.as_str()));
        assert!(!Signature::has_tag("nothing to see here"));
    }

    #[test]
    fn test_signatures_pairwise_distinct() {
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(Signature::generate().as_str().to_string()));
        }
    }

    #[test]
    fn test_signature_is_store_safe() {
        // The store's input format and directory naming rely on these
        for _ in 0..100 {
            let sig = Signature::generate();
            assert!(!sig.as_str().contains(','));
            assert!(!sig.as_str().contains('\n'));
            assert!(sig.as_str().is_ascii());
        }
    }
}
