//! Argon2id password digests.
//!
//! Digests are stored as PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`),
//! so each one carries its own cost parameters and verification keeps
//! working after the configured cost is raised.

use argon2::password_hash::{
    self, PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

/// [`PasswordHasher`] adapter backed by the `argon2` crate.
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2Hasher {
    /// Argon2id with the crate's recommended cost.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom cost: memory in KiB, passes and lanes.
    ///
    /// # Errors
    /// Returns [`PasswordHasherError::Hashing`] when argon2 refuses the
    /// combination, for example memory below eight blocks per lane.
    pub fn with_cost(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordHasherError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHasherError> {
        let salt = SaltString::generate(&mut OsRng);
        let digest = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        Ok(PasswordHash::new(digest.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError> {
        let stored = PhcString::new(hash.as_str()).map_err(|_| PasswordHasherError::MalformedHash)?;
        // Verification reads the algorithm and cost from `stored`.
        match self.argon2().verify_password(password.as_bytes(), &stored) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(
                password_hash::Error::Algorithm
                | password_hash::Error::ParamValueInvalid(_)
                | password_hash::Error::Version,
            ) => Err(PasswordHasherError::MalformedHash),
            Err(err) => Err(PasswordHasherError::hashing(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn hasher() -> Argon2Hasher {
        Argon2Hasher::with_cost(8, 1, 1).expect("minimal cost")
    }

    #[rstest]
    fn hash_round_trips_and_rejects_wrong_password(hasher: Argon2Hasher) {
        let hash = hasher.hash("correct horse").expect("hash");
        assert!(hasher.verify("correct horse", &hash).expect("verify"));
        assert!(!hasher.verify("correct horsE", &hash).expect("verify"));
    }

    #[rstest]
    fn hashes_are_salted_phc_strings(hasher: Argon2Hasher) {
        let first = hasher.hash("same").expect("hash");
        let second = hasher.hash("same").expect("hash");
        assert_ne!(first, second);
        assert!(first.as_str().starts_with("$argon2id$v=19$m=8,t=1,p=1$"));
        assert!(!first.as_str().contains("same"));
    }

    #[rstest]
    fn verify_uses_stored_cost(hasher: Argon2Hasher) {
        let stored = Argon2Hasher::with_cost(16, 2, 1)
            .expect("cost")
            .hash("pw123456")
            .expect("hash");
        assert!(stored.as_str().contains("m=16,t=2,p=1"));
        assert!(hasher.verify("pw123456", &stored).expect("verify"));
    }

    #[rstest]
    #[case("plaintext")]
    #[case("sha256$1$00$00")]
    #[case("$scrypt$ln=15,r=8,p=1$c2FsdHNhbHQ$ZGlnZXN0ZGlnZXN0")]
    fn malformed_hashes_are_reported(hasher: Argon2Hasher, #[case] raw: &str) {
        assert_eq!(
            hasher.verify("pw", &PasswordHash::new(raw)),
            Err(PasswordHasherError::MalformedHash)
        );
    }

    #[rstest]
    fn impossible_cost_is_refused() {
        assert!(matches!(
            Argon2Hasher::with_cost(1, 1, 4),
            Err(PasswordHasherError::Hashing { .. })
        ));
    }
}
