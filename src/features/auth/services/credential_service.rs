use crate::core::error::{AppError, Result};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash a plaintext password into a PHC string (argon2id, random salt)
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a plaintext password against a stored PHC string.
/// A malformed stored hash verifies as false.
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is not a valid PHC string: {}", e);
            false
        }
    }
}

/// `hash_password` off the async runtime; argon2 is deliberately slow
pub async fn hash_password_blocking(plaintext: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&plaintext))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
}

/// `verify_password` off the async runtime
pub async fn verify_password_blocking(plaintext: String, stored_hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&plaintext, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-pass", &hash));
        assert!(!verify_password("wrong-pass", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "plaintext-in-db"));
    }

    #[tokio::test]
    async fn test_blocking_wrappers() {
        let hash = hash_password_blocking("pw".to_string()).await.unwrap();
        assert!(verify_password_blocking("pw".to_string(), hash)
            .await
            .unwrap());
    }
}
