//! Password hashing for customer accounts.

use sha2::{Digest, Sha256};

/// Turns plain passwords into stored hashes.
///
/// The encoder name is stored next to each hash so hashes produced by a
/// different encoder can be recognised later.
pub trait PasswordEncoder: Send + Sync {
    /// Name recorded with every hash this encoder produces.
    fn name(&self) -> &str;

    fn encode(&self, password: &str) -> String;

    fn is_valid(&self, password: &str, hash: &str) -> bool {
        self.encode(password) == hash
    }
}

/// Hex encoded SHA-256 digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256PasswordEncoder;

impl PasswordEncoder for Sha256PasswordEncoder {
    fn name(&self) -> &str {
        "sha256"
    }

    fn encode(&self, password: &str) -> String {
        format!("{:x}", Sha256::digest(password.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_encoding() {
        let encoder = Sha256PasswordEncoder;
        let hash = encoder.encode("fooobar");

        assert_eq!(hash.len(), 64);
        assert_ne!(hash, "fooobar");
        assert_eq!(
            encoder.encode("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(encoder.is_valid("fooobar", &hash));
        assert!(!encoder.is_valid("foobar", &hash));
    }
}
