//! Argon2id password hashing with tunable cost parameters.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use hygge_core::ports::{AuthError, PasswordService};

/// Argon2id cost parameters. The defaults match the library's current
/// recommended baseline; deployments tune them via environment.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Argon2id-based password service. Hashes are PHC strings, so stored
/// credentials keep verifying after the cost parameters change.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new(config: PasswordConfig) -> Result<Self, AuthError> {
        let params = Params::new(config.memory_kib, config.iterations, config.parallelism, None)
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn from_env() -> Self {
        let defaults = PasswordConfig::default();
        let config = PasswordConfig {
            memory_kib: env_u32("ARGON2_MEMORY_KIB", defaults.memory_kib),
            iterations: env_u32("ARGON2_ITERATIONS", defaults.iterations),
            parallelism: env_u32("ARGON2_PARALLELISM", defaults.parallelism),
        };

        Self::new(config).unwrap_or_else(|e| {
            tracing::warn!("Rejected Argon2 parameters ({e}); falling back to library defaults");
            Self {
                argon2: Argon2::default(),
            }
        })
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        // A stored hash that fails to parse is corrupt data, not a
        // wrong password.
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_round_trip_accepts_the_original_password_only() {
        let service = Argon2PasswordService::from_env();

        let hash = service.hash("hygge-and-cocoa-2026").unwrap();

        assert!(service.verify("hygge-and-cocoa-2026", &hash).unwrap());
        assert!(!service.verify("hygge-and-cocoa-2025", &hash).unwrap());
    }

    #[test]
    fn password_change_produces_a_fresh_salt() {
        let service = Argon2PasswordService::from_env();

        let first = service.hash("same-secret").unwrap();
        let second = service.hash("same-secret").unwrap();

        assert_ne!(first, second);
        assert!(service.verify("same-secret", &first).unwrap());
        assert!(service.verify("same-secret", &second).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error_not_a_mismatch() {
        let service = Argon2PasswordService::from_env();

        let result = service.verify("anything", "not-a-phc-string");

        assert!(matches!(result, Err(AuthError::HashingError(_))));
    }

    #[test]
    fn explicit_cost_parameters_land_in_the_hash() {
        let service = Argon2PasswordService::new(PasswordConfig {
            memory_kib: 8192,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();

        let hash = service.hash("tuned").unwrap();

        assert!(hash.contains("m=8192"));
        assert!(service.verify("tuned", &hash).unwrap());
    }

    #[test]
    fn out_of_range_parameters_are_rejected() {
        let result = Argon2PasswordService::new(PasswordConfig {
            memory_kib: 1,
            iterations: 0,
            parallelism: 0,
        });

        assert!(matches!(result, Err(AuthError::HashingError(_))));
    }
}
