//! Content fingerprinting for change detection.
//!
//! The digest covers exactly `title|owner|description`. Status and date
//! metadata are excluded so that status-only edits never register as content
//! changes during reconciliation.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Hex chars kept from the SHA-256 digest. The truncated digest doubles as
/// the decision macro id in the page markup.
const FINGERPRINT_LEN: usize = 16;

/// A truncated SHA-256 hex digest identifying a decision's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Digest `(title, owner, description)` into a [`Fingerprint`].
///
/// Identical inputs always yield the identical fingerprint.
pub fn fingerprint(title: &str, owner: &str, description: &str) -> Fingerprint {
    let mut h = Sha256::new();
    h.update(format!("{title}|{owner}|{description}").as_bytes());
    let digest = hex::encode(h.finalize());
    Fingerprint(digest[..FINGERPRINT_LEN].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_across_calls() {
        let a = fingerprint("Ship v2", "Alice", "Ship it.");
        let b = fingerprint("Ship v2", "Alice", "Ship it.");
        assert_eq!(a, b);
    }

    #[test]
    fn any_field_change_changes_digest() {
        let base = fingerprint("Ship v2", "Alice", "Ship it.");
        assert_ne!(base, fingerprint("Ship v3", "Alice", "Ship it."));
        assert_ne!(base, fingerprint("Ship v2", "Bob", "Ship it."));
        assert_ne!(base, fingerprint("Ship v2", "Alice", "Hold it."));
    }

    #[test]
    fn digest_is_lowercase_hex_of_fixed_width() {
        let fp = fingerprint("t", "o", "d");
        assert_eq!(fp.0.len(), FINGERPRINT_LEN);
        assert!(fp.0.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn separator_prevents_field_bleed() {
        // "ab" + "c" must not collide with "a" + "bc".
        assert_ne!(fingerprint("ab", "c", "d"), fingerprint("a", "bc", "d"));
    }
}
