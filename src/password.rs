//! Password hashing and verification

use anyhow::Result;
use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Hash a plaintext secret into an argon2 digest.
pub fn hash(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let digest = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))?
        .to_string();
    Ok(digest)
}

/// Verify a plaintext secret against a stored digest. An unparseable
/// digest counts as a mismatch.
pub fn verify(plain: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_verifies_original_secret_only() {
        let digest = hash("password123").unwrap();
        assert!(verify("password123", &digest));
        assert!(!verify("password124", &digest));
    }

    #[test]
    fn malformed_digest_never_verifies() {
        assert!(!verify("password123", "not-a-digest"));
    }
}
