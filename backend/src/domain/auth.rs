//! Password hashing for the session login flow.
//!
//! Digests are salted SHA-256, stored as two hex strings. The salt is 16
//! random bytes drawn per account.

use sha2::{Digest, Sha256};

/// Salted password digest for a single account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: String,
    digest: String,
}

impl PasswordHash {
    /// Derive a hash for a new password with a fresh random salt.
    pub fn derive(password: &str) -> Self {
        let salt: [u8; 16] = rand::random();
        let salt = hex::encode(salt);
        let digest = Self::digest_with(&salt, password);
        Self { salt, digest }
    }

    /// Reconstruct a hash from stored hex parts.
    pub fn from_parts(salt: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            salt: salt.into(),
            digest: digest.into(),
        }
    }

    /// Check a candidate password against the stored digest.
    pub fn verify(&self, password: &str) -> bool {
        Self::digest_with(&self.salt, password) == self.digest
    }

    /// Hex-encoded salt.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Hex-encoded digest.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    fn digest_with(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_hash_verifies_the_same_password() {
        let hash = PasswordHash::derive("hunter2");
        assert!(hash.verify("hunter2"));
        assert!(!hash.verify("hunter3"));
    }

    #[test]
    fn salts_differ_between_derivations() {
        let a = PasswordHash::derive("same");
        let b = PasswordHash::derive("same");
        assert_ne!(a.salt(), b.salt());
        assert_ne!(a.digest(), b.digest());
    }

    #[test]
    fn round_trips_through_stored_parts() {
        let hash = PasswordHash::derive("hunter2");
        let restored = PasswordHash::from_parts(hash.salt(), hash.digest());
        assert!(restored.verify("hunter2"));
    }
}
