use crate::config::EnvironmentProvider;
use crate::config::errors::ApplicationError;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValueSource {
    EnvironmentVariable { name: String },
    Default,
}

#[derive(Debug, Clone)]
pub struct ConfigValue {
    pub value: String,
    pub source: ConfigValueSource,
}

/// Configuration specification with environment override → default priority
pub struct ConfigSpec<'a> {
    env_provider: &'a dyn EnvironmentProvider,
    pub env_override: Option<String>,
    pub default_value: Option<String>,
    pub required: bool,
    pub min_length: Option<usize>,
    pub validator: Option<fn(&str) -> Result<(), String>>,
}

impl<'a> ConfigSpec<'a> {
    pub fn new(env_provider: &'a dyn EnvironmentProvider) -> Self {
        Self {
            env_provider,
            env_override: None,
            default_value: None,
            required: false,
            min_length: None,
            validator: None,
        }
    }

    pub fn env_override(mut self, name: &str) -> Self {
        self.env_override = Some(name.to_string());
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn validator(mut self, f: fn(&str) -> Result<(), String>) -> Self {
        self.validator = Some(f);
        self
    }

    fn setting_name(&self) -> &str {
        self.env_override.as_deref().unwrap_or("unknown_setting")
    }

    /// Load the value: environment override first, then the default
    pub fn load(&self) -> Result<ConfigValue, ApplicationError> {
        if let Some(env_var) = &self.env_override {
            if let Some(value) = self.env_provider.get_var(env_var) {
                self.validate_value(&value)?;
                return Ok(ConfigValue {
                    value,
                    source: ConfigValueSource::EnvironmentVariable {
                        name: env_var.clone(),
                    },
                });
            }
        }

        if let Some(default) = &self.default_value {
            self.validate_value(default)?;
            return Ok(ConfigValue {
                value: default.clone(),
                source: ConfigValueSource::Default,
            });
        }

        if self.required {
            return Err(ApplicationError::InvalidSetting {
                setting_name: self.setting_name().to_string(),
                reason: "Required setting has no value from any source".to_string(),
            });
        }

        Ok(ConfigValue {
            value: String::new(),
            source: ConfigValueSource::Default,
        })
    }

    fn validate_value(&self, value: &str) -> Result<(), ApplicationError> {
        if let Some(min) = self.min_length {
            if value.len() < min {
                return Err(ApplicationError::InvalidSetting {
                    setting_name: self.setting_name().to_string(),
                    reason: format!("must be at least {} characters", min),
                });
            }
        }

        if let Some(validator) = self.validator {
            validator(value).map_err(|reason| ApplicationError::InvalidSetting {
                setting_name: self.setting_name().to_string(),
                reason,
            })?;
        }

        Ok(())
    }

    pub fn validate_host_address(value: &str) -> Result<(), String> {
        if value.is_empty() {
            return Err("host cannot be empty".to_string());
        }
        if value.parse::<std::net::IpAddr>().is_ok() || value == "localhost" {
            return Ok(());
        }
        if value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Ok(());
        }
        Err(format!("'{}' is not a valid host address", value))
    }

    pub fn validate_port_range(value: &str, min: u16, max: u16) -> Result<(), String> {
        let port: u16 = value
            .parse()
            .map_err(|_| format!("'{}' is not a valid port number", value))?;
        if port < min || port > max {
            return Err(format!("port must be between {} and {}", min, max));
        }
        Ok(())
    }

    pub fn validate_positive_integer(value: &str) -> Result<(), String> {
        match value.parse::<i64>() {
            Ok(n) if n > 0 => Ok(()),
            _ => Err(format!("'{}' is not a positive integer", value)),
        }
    }

    pub fn parse_port(value: &str, setting_name: &str) -> Result<u16, ApplicationError> {
        value.parse().map_err(|e: std::num::ParseIntError| ApplicationError::ParseError {
            setting_name: setting_name.to_string(),
            error: e.to_string(),
        })
    }

    pub fn parse_i64(value: &str, setting_name: &str) -> Result<i64, ApplicationError> {
        value.parse().map_err(|e: std::num::ParseIntError| ApplicationError::ParseError {
            setting_name: setting_name.to_string(),
            error: e.to_string(),
        })
    }
}
