use crate::error::AuthError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Password hashing seam, so tests can trade strength for speed.
pub trait Hasher: Send + Sync {
    fn generate_hash(&self, password: &str) -> Result<String, AuthError>;
    fn check_hash(&self, hash: &str, password: &str) -> bool;
}

/// Argon2id with PHC-string output.
#[derive(Clone, Debug, Default)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Hasher for Argon2Hasher {
    fn generate_hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Backend(format!("password hashing failed: {e}")))
    }

    fn check_hash(&self, hash: &str, password: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(error) => {
                tracing::warn!(error = %error, "stored password hash is malformed");
                false
            }
        }
    }
}

#[cfg(any(test, feature = "test_utils"))]
pub fn fast_hasher() -> Argon2Hasher {
    let params = Params::new(Params::MIN_M_COST, 1, 1, None).unwrap_or_default();
    Argon2Hasher::new(params)
}
