//! Salted one-way password digests.

use crate::types::{AuthConfig, PasswordDigest};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

pub mod error {
    use thiserror::Error;

    #[derive(Debug, Error)]
    pub enum CredentialError {
        #[error("Invalid Argon2 parameters: {0}")]
        Params(#[from] argon2::Error),

        #[error("Password hashing failed: {0}")]
        Hash(#[from] argon2::password_hash::Error),
    }
}

use error::CredentialError;

/// Argon2id hasher configured from [`AuthConfig`].
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new(config: &AuthConfig) -> Result<Self, CredentialError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hashes with a fresh random salt, so equal passwords give distinct digests.
    pub(crate) fn hash(&self, password: &str) -> Result<PasswordDigest, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .argon2
            .hash_password(password.as_bytes(), &salt)?
            .to_string();
        Ok(PasswordDigest::new(phc))
    }

    /// Cost parameters are read from the digest itself, so digests made under
    /// older settings still verify.
    pub(crate) fn verify(&self, password: &str, digest: &PasswordDigest) -> bool {
        let Ok(parsed) = PasswordHash::new(digest.as_str()) else {
            return false;
        };

        self.argon2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
