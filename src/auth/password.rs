//! Password Hasher
//! Mission: One-way bcrypt hashing for customer passwords

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

/// bcrypt-backed hasher with a configurable work factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self { cost: DEFAULT_COST }
    }
}

impl PasswordHasher {
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password. The salt is random per call and embedded in the output.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        hash(plaintext, self.cost).context("Failed to hash password")
    }

    /// Check a plaintext against a stored hash.
    ///
    /// A malformed hash counts as a mismatch rather than an error.
    pub fn verify(&self, plaintext: &str, password_hash: &str) -> bool {
        verify(plaintext, password_hash).unwrap_or(false)
    }
}
