// Password hashing and verification

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::auth::error::AuthError;

/// Password service for hashing and verification
///
/// Hashes are Argon2id PHC strings with a random salt and the crate's fixed
/// default cost parameters.
pub struct PasswordService;

impl PasswordService {
    /// Hash a plaintext password
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    /// Verify a plaintext password against a stored hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::PasswordHash(e.to_string())),
        }
    }

    /// Hash on the blocking pool so the request task is not stalled
    pub async fn hash_password_async(password: String) -> Result<String, AuthError> {
        tokio::task::spawn_blocking(move || Self::hash_password(&password))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
    }

    /// Verify on the blocking pool so the request task is not stalled
    pub async fn verify_password_async(password: String, hash: String) -> Result<bool, AuthError> {
        tokio::task::spawn_blocking(move || Self::verify_password(&password, &hash))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = PasswordService::hash_password("12345678").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(PasswordService::verify_password("12345678", &hash).unwrap());
        assert!(!PasswordService::verify_password("87654321", &hash).unwrap());
    }

    #[test]
    fn test_same_password_different_salts() {
        let first = PasswordService::hash_password("same_password").unwrap();
        let second = PasswordService::hash_password("same_password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hash = PasswordService::hash_password("plaintext-secret").unwrap();
        assert!(!hash.contains("plaintext-secret"));
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(PasswordService::verify_password("12345678", "not_a_phc_string").is_err());
    }

    #[tokio::test]
    async fn test_async_round_trip() {
        let hash = PasswordService::hash_password_async("abcdefgh".to_string())
            .await
            .unwrap();
        let ok = PasswordService::verify_password_async("abcdefgh".to_string(), hash)
            .await
            .unwrap();
        assert!(ok);
    }
}
