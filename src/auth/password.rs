/// Password Hashing and Verification
///
/// The hashing primitive the authentication backend verifies credentials
/// with. Both the "user found" and "user not found" paths go through
/// `verify`, which is what keeps their cost comparable.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

pub trait PasswordHasher: Send + Sync {
    /// Hash a plain text password
    fn hash(&self, password: &str) -> Result<String, AppError>;

    /// Verify a plain text password against a stored hash
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError>;
}

/// bcrypt-backed hasher
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Lower costs are only meant for tests
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        verify(password, hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> BcryptHasher {
        BcryptHasher::with_cost(4)
    }

    #[test]
    fn test_hash_password() {
        let hash = hasher().hash("12345").expect("Failed to hash password");

        assert_ne!("12345", hash);
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_verify_password() {
        let hash = hasher().hash("12345").expect("Failed to hash password");

        let is_valid = hasher().verify("12345", &hash).expect("Failed to verify password");
        assert!(is_valid);
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hasher().hash("12345").expect("Failed to hash password");

        let is_valid = hasher().verify("wrong", &hash).expect("Failed to verify password");
        assert!(!is_valid);
    }

    #[test]
    fn test_verify_against_garbage_hash_errors() {
        assert!(hasher().verify("12345", "not-a-bcrypt-hash").is_err());
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(BcryptHasher::default().cost, DEFAULT_COST);
    }
}
