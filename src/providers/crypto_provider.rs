use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;

use crate::errors::InternalError;

type HmacSha256 = Hmac<Sha256>;

pub const OTP_LENGTH: usize = 6;

/// Cryptographic operations provider
///
/// HMAC-SHA256 hashing of one-time codes and secure code generation.
pub struct CryptoProvider;

impl CryptoProvider {
    pub fn new() -> Self {
        Self
    }

    /// Compute HMAC-SHA256 of `value` keyed by `key`, hex encoded
    pub fn hmac_sha256(&self, key: &str, value: &str) -> Result<String, InternalError> {
        let mut mac = HmacSha256::new_from_slice(key.as_bytes())
            .map_err(|e| InternalError::crypto("hmac_init", e.to_string()))?;
        mac.update(value.as_bytes());
        Ok(format!("{:x}", mac.finalize().into_bytes()))
    }

    /// Compare two hashes without short-circuiting on the first differing byte
    pub fn hashes_match(&self, expected: &str, actual: &str) -> bool {
        if expected.len() != actual.len() {
            return false;
        }
        expected
            .bytes()
            .zip(actual.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Generate a numeric one-time code, zero padded to `OTP_LENGTH` digits
    pub fn generate_otp_code(&self) -> String {
        let mut rng = rand::rng();
        (0..OTP_LENGTH)
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect()
    }
}

impl Default for CryptoProvider {
    fn default() -> Self {
        Self::new()
    }
}
