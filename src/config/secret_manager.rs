use std::fmt;

use crate::config::errors::SecretError;
use crate::config::{EnvironmentProvider, SecretConfig, SecretType, SystemEnvironment};

pub const JWT_SECRET_VAR: &str = "JWT_SECRET";
pub const OTP_PEPPER_VAR: &str = "OTP_PEPPER";

/// Centralized holder for application secrets
pub struct SecretManager {
    jwt_secret: String,
    otp_pepper: String,
}

impl SecretManager {
    /// Load and validate all secrets from the process environment
    pub fn init() -> Result<Self, SecretError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, SecretError> {
        let jwt_secret = Self::load_secret(env, &Self::jwt_config())?;
        let otp_pepper = Self::load_secret(env, &Self::pepper_config())?;

        Ok(Self {
            jwt_secret,
            otp_pepper,
        })
    }

    fn jwt_config() -> SecretConfig {
        SecretConfig::env_var(JWT_SECRET_VAR).required(true).min_length(32)
    }

    fn pepper_config() -> SecretConfig {
        SecretConfig::env_var(OTP_PEPPER_VAR).required(true).min_length(16)
    }

    fn load_secret(env: &dyn EnvironmentProvider, config: &SecretConfig) -> Result<String, SecretError> {
        let value = match &config.secret_type {
            SecretType::EnvVar { name } => env.get_var(name),
        };
        let secret_name = config.secret_type.name();

        let value = match value {
            Some(v) if !v.is_empty() => v,
            _ if config.required => return Err(SecretError::missing(secret_name)),
            _ => return Ok(String::new()),
        };

        if let Some(min) = config.min_length {
            if value.len() < min {
                return Err(SecretError::invalid_length(secret_name, min, value.len()));
            }
        }

        Ok(value)
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn otp_pepper(&self) -> &str {
        &self.otp_pepper
    }
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("jwt_secret", &"[REDACTED]")
            .field("otp_pepper", &"[REDACTED]")
            .finish()
    }
}
