//! SHA-256 digests of fetched artefacts.
//!
//! [`compute`] is the only constructor for [`Sha256Digest`], so every digest
//! in a manifest describes the exact bytes it was computed from and is always
//! 64 lowercase hexadecimal characters, the form DotSlash verifies against.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;

/// Hex-encoded SHA-256 digest of an artefact's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute the SHA-256 digest of `bytes`.
///
/// # Examples
///
/// ```
/// use dotslash_gen::digest::compute;
///
/// let digest = compute(b"");
/// assert_eq!(
///     digest.as_str(),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn compute(bytes: &[u8]) -> Sha256Digest {
    Sha256Digest(format!("{:x}", Sha256::digest(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty(b"".as_slice(), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")]
    #[case::abc(b"abc".as_slice(), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")]
    fn compute_matches_known_vectors(#[case] input: &[u8], #[case] expected: &str) {
        assert_eq!(compute(input).as_str(), expected);
    }

    #[rstest]
    #[case::empty(b"".as_slice())]
    #[case::binary(&[0x00, 0xff, 0x7f, 0x80])]
    #[case::large(&[0x5a; 70_000])]
    fn computed_digest_is_lowercase_hex(#[case] input: &[u8]) {
        let digest = compute(input);
        assert_eq!(digest.as_str().len(), 64);
        assert!(
            digest
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
            "unexpected digest {digest}"
        );
    }

    #[test]
    fn differing_bytes_give_differing_digests() {
        assert_ne!(compute(b"tool-1.2.3"), compute(b"tool-1.2.4"));
    }

    #[test]
    fn display_matches_hex_string() {
        let digest = compute(b"abc");
        assert_eq!(digest.to_string(), digest.as_str());
    }

    #[test]
    fn serialises_as_plain_string() {
        let digest = compute(b"abc");
        let json = serde_json::to_string(&digest).expect("serialise");
        assert_eq!(json, format!("\"{}\"", digest.as_str()));
    }
}
