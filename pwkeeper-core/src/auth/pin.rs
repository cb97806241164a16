//! PIN validation and Argon2id hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

use crate::error::{Error, Result};

/// Number of digits in a PIN.
pub const PIN_LENGTH: usize = 6;

/// Check that `pin` is exactly [`PIN_LENGTH`] ASCII digits.
pub fn validate_pin(pin: &str) -> Result<()> {
    if pin.len() != PIN_LENGTH || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::Validation(format!("PIN must be {} digits", PIN_LENGTH)));
    }
    Ok(())
}

/// A PIN stored as an Argon2id PHC string.
#[derive(Clone, PartialEq, Eq)]
pub struct PinHash {
    hash: String,
}

impl PinHash {
    /// Memory: 16 MiB, Iterations: 2, Parallelism: 2
    pub const ARGON2_PARAMS: (u32, u32, u32) = (16384, 2, 2);

    /// Validate and hash a new PIN.
    pub fn hash(pin: &str) -> Result<Self> {
        validate_pin(pin)?;
        Self::hash_unchecked(pin)
    }

    /// Hash a PIN read from a legacy plaintext preferences file. Legacy
    /// values are accepted as they are so existing users can still log in.
    pub(crate) fn from_legacy_plaintext(pin: &str) -> Result<Self> {
        Self::hash_unchecked(pin)
    }

    fn hash_unchecked(pin: &str) -> Result<Self> {
        let salt = SaltString::generate(&mut OsRng);

        let params = ParamsBuilder::new()
            .m_cost(Self::ARGON2_PARAMS.0)
            .t_cost(Self::ARGON2_PARAMS.1)
            .p_cost(Self::ARGON2_PARAMS.2)
            .build()
            .map_err(|e| Error::Security(e.to_string()))?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

        let hash = argon2
            .hash_password(pin.as_bytes(), &salt)
            .map_err(|e| Error::Security(e.to_string()))?
            .to_string();

        Ok(Self { hash })
    }

    /// Check an entered PIN against the stored hash.
    pub fn verify(&self, pin: &str) -> Result<bool> {
        let parsed = PasswordHash::new(&self.hash).map_err(|e| Error::Security(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(pin.as_bytes(), &parsed)
            .is_ok())
    }

    /// Load a previously stored PHC string.
    pub fn from_hash(hash: String) -> Result<Self> {
        PasswordHash::new(&hash).map_err(|e| Error::Security(e.to_string()))?;
        Ok(Self { hash })
    }

    /// Whether `value` looks like a PHC string rather than a plaintext PIN.
    pub fn is_hash(value: &str) -> bool {
        value.starts_with('$')
    }

    /// PHC string for storage.
    pub fn hash_string(&self) -> &str {
        &self.hash
    }
}

impl std::fmt::Debug for PinHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PinHash([REDACTED])")
    }
}
