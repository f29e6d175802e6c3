use std::fmt;

use crate::config::config_spec::ConfigSpec;
use crate::config::errors::ApplicationError;
use crate::config::{EnvironmentProvider, SystemEnvironment};

/// Infrastructure settings read once at startup
pub struct BootstrapSettings {
    database_url: String,
    server_host: String,
    server_port: u16,
    jwt_expiration_minutes: i64,
    otp_expiration_minutes: i64,
}

impl BootstrapSettings {
    pub fn from_env_provider(env_provider: &dyn EnvironmentProvider) -> Result<Self, ApplicationError> {
        let database_url = ConfigSpec::new(env_provider)
            .env_override("DATABASE_URL")
            .default_value("sqlite://portal.db?mode=rwc")
            .min_length(1)
            .load()?
            .value;

        let server_host = ConfigSpec::new(env_provider)
            .env_override("HOST")
            .default_value("0.0.0.0")
            .validator(ConfigSpec::validate_host_address)
            .load()?
            .value;

        let port_value = ConfigSpec::new(env_provider)
            .env_override("PORT")
            .default_value("3000")
            .validator(|value| ConfigSpec::validate_port_range(value, 1, 65535))
            .load()?
            .value;
        let server_port = ConfigSpec::parse_port(&port_value, "PORT")?;

        let jwt_value = ConfigSpec::new(env_provider)
            .env_override("JWT_EXPIRATION_MINUTES")
            .default_value("60")
            .validator(ConfigSpec::validate_positive_integer)
            .load()?
            .value;
        let jwt_expiration_minutes = ConfigSpec::parse_i64(&jwt_value, "JWT_EXPIRATION_MINUTES")?;

        let otp_value = ConfigSpec::new(env_provider)
            .env_override("OTP_EXPIRATION_MINUTES")
            .default_value("10")
            .validator(ConfigSpec::validate_positive_integer)
            .load()?
            .value;
        let otp_expiration_minutes = ConfigSpec::parse_i64(&otp_value, "OTP_EXPIRATION_MINUTES")?;

        Ok(Self {
            database_url,
            server_host,
            server_port,
            jwt_expiration_minutes,
            otp_expiration_minutes,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, ApplicationError> {
        Self::from_env_provider(&SystemEnvironment)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn jwt_expiration_minutes(&self) -> i64 {
        self.jwt_expiration_minutes
    }

    pub fn otp_expiration_minutes(&self) -> i64 {
        self.otp_expiration_minutes
    }
}

impl fmt::Debug for BootstrapSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapSettings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("otp_expiration_minutes", &self.otp_expiration_minutes)
            .finish()
    }
}
