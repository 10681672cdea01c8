/// Configuration schema for the activation tool
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::codec::MasterSecret;
use crate::codec::cipher::{BASE_IV_STRING, BASE_KEY_STRING};
use crate::error::{LicenseError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Base URL of the activation API (`/verify` is appended)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Where the password is checked
    #[serde(default)]
    pub verify_mode: VerifyMode,

    /// Triple SHA-256 of the master password, required for local mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    /// HTTP timeout for the verification call (seconds)
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Log level: "trace", "debug", "info", "warn", "error", "off"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory for generated `.slic` files (defaults to the working directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// Shared secret strings of the desktop application
    #[serde(default)]
    pub secret: SecretConfig,
}

/// Password verification mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyMode {
    /// POST the hash to the activation API
    #[default]
    Remote,
    /// Compare against `password_hash`
    Local,
}

#[derive(Clone, Deserialize, Serialize)]
pub struct SecretConfig {
    pub key: String,
    pub iv: String,
}

impl Default for SecretConfig {
    fn default() -> Self {
        Self {
            key: BASE_KEY_STRING.to_string(),
            iv: BASE_IV_STRING.to_string(),
        }
    }
}

impl std::fmt::Debug for SecretConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretConfig(<redacted>)")
    }
}

fn default_api_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            verify_mode: VerifyMode::default(),
            password_hash: None,
            request_timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
            output_dir: None,
            secret: SecretConfig::default(),
        }
    }
}

impl Config {
    /// Get the effective API URL, prioritizing compile-time default
    pub fn get_api_base_url(&self) -> String {
        // If SLIC_API_BASE_URL was set at compile time, use it (hardcoded into binary)
        if let Some(compile_time_url) = option_env!("SLIC_API_BASE_URL") {
            if !compile_time_url.is_empty() {
                return compile_time_url.to_string();
            }
        }

        self.api_base_url.clone()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Static key material, built once and shared for the process lifetime
    pub fn master_secret(&self) -> MasterSecret {
        MasterSecret::from_strings(&self.secret.key, &self.secret.iv)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let effective_url = self.get_api_base_url();

        if effective_url.is_empty() {
            return Err(LicenseError::Config("api_base_url cannot be empty".to_string()));
        }

        if !effective_url.starts_with("http://") && !effective_url.starts_with("https://") {
            return Err(LicenseError::Config(
                "api_base_url must start with http:// or https://".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(LicenseError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.verify_mode == VerifyMode::Local
            && self.password_hash.as_deref().map_or(true, |h| h.trim().is_empty())
        {
            return Err(LicenseError::Config(
                "password_hash is required when verify_mode is local".to_string(),
            ));
        }

        if self.secret.key.is_empty() || self.secret.iv.is_empty() {
            return Err(LicenseError::Config("secret key and iv cannot be empty".to_string()));
        }

        Ok(())
    }
}
