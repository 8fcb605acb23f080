//! Fingerprint hashing for visited-state deduplication.
//!
//! A fingerprint is a hash over a game-declared subset of a state's bytes
//! (the "hash includes"), never the whole blob — cosmetic or nondeterministic
//! bytes (animation timers and similar) are excluded by the Game, not by
//! this module.

use sha2::{Digest, Sha256};

/// Domain prefix for fingerprint hashing. Kept distinct from any other
/// hash domain in the workspace so no accidental cross-domain collision
/// between a fingerprint and, say, a candidate-action hash is possible.
pub const DOMAIN_FINGERPRINT: &[u8] = b"FRONTIER::FINGERPRINT::V1\0";

/// A 64-bit fingerprint over a game-declared subset of state bytes.
///
/// 64 bits (rather than 128) is the chosen width: see `SPEC_FULL.md`'s
/// Open Questions for the rationale — a u64 fits in an atomic/lock-free
/// set entry directly, and at the stated scale (bounded HashDB, millions
/// of states) a 64-bit digest's collision probability is negligible
/// relative to other sources of search error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u64);

impl Fingerprint {
    #[must_use]
    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[must_use]
    pub fn as_u64(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        hex::encode(self.0.to_be_bytes())
    }
}

/// Compute the fingerprint over `hash_include_bytes`, the concatenation of
/// the byte ranges the Game declared relevant (in declaration order).
///
/// `sha256(DOMAIN_FINGERPRINT || bytes)`, truncated to its first 8 bytes
/// read as a big-endian `u64`.
#[must_use]
pub fn compute_fingerprint(hash_include_bytes: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_FINGERPRINT);
    hasher.update(hash_include_bytes);
    let digest = hasher.finalize();
    let mut bits = [0u8; 8];
    bits.copy_from_slice(&digest[..8]);
    Fingerprint::from_bits(u64::from_be_bytes(bits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_deterministic() {
        let a = compute_fingerprint(b"hello");
        let b = compute_fingerprint(b"hello");
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_distinguishes_inputs() {
        let a = compute_fingerprint(b"hello");
        let b = compute_fingerprint(b"world");
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_hex_is_sixteen_chars() {
        let fp = compute_fingerprint(b"anything");
        assert_eq!(fp.to_hex().len(), 16);
    }

    #[test]
    fn fingerprint_domain_prefix_is_null_terminated() {
        assert!(DOMAIN_FINGERPRINT.ends_with(&[0]));
    }
}
