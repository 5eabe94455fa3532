//! Password value object - Domain layer password handling.
//!
//! Hashing is Argon2id with a fresh random salt per call. The cost of a hash
//! is controlled by a [`WorkFactor`]; verification reads the parameters back
//! out of the stored PHC string, so raising the work factor never breaks
//! existing hashes.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::errors::{AppError, AppResult};

/// Argon2 cost parameters.
///
/// Higher values make each hash proportionally slower; pick the largest the
/// request latency budget tolerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkFactor {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl WorkFactor {
    /// Create a work factor, rejecting parameter combinations Argon2 refuses.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> AppResult<Self> {
        let work_factor = Self {
            memory_kib,
            iterations,
            parallelism,
        };
        work_factor.params()?;
        Ok(work_factor)
    }

    pub fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    fn params(&self) -> AppResult<Params> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AppError::validation(format!("Invalid password work factor: {}", e)))
    }

    #[inline]
    fn argon2(&self) -> AppResult<Argon2<'static>> {
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params()?))
    }
}

impl Default for WorkFactor {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

/// Password value object that handles hashing and verification.
///
/// Only ever holds the hash; the plaintext is consumed by [`Password::new`].
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns a validation error if the password is empty, or an internal
    /// error if hashing fails.
    pub fn new(plain_text: &str, work_factor: &WorkFactor) -> AppResult<Self> {
        if plain_text.is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = work_factor
            .argon2()?
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();

        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// A stored value that is not a parseable PHC string never matches.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                false
            }
        }
    }
}
