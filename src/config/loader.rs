/// Configuration loader
use super::schema::Config;
use crate::error::{LicenseError, Result};
use crate::verification::local::normalize_hash;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `password_hash`
pub const PASSWORD_HASH_ENV: &str = "SLIC_PASSWORD_HASH";

/// Load configuration
///
/// Lookup order: explicit path, then `<executable>.config` next to the
/// binary (e.g. "slic-activator.config"), then built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => read_config_file(path)?,
        None => match adjacent_config_path() {
            Some(path) if path.exists() => read_config_file(&path)?,
            _ => {
                log::debug!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(&mut config, std::env::var(PASSWORD_HASH_ENV).ok());

    config.validate()?;

    Ok(config)
}

fn adjacent_config_path() -> Option<PathBuf> {
    let exe_path = std::env::current_exe().ok()?;
    Some(PathBuf::from(format!("{}.config", exe_path.display())))
}

pub fn read_config_file(path: &Path) -> Result<Config> {
    let config_content = fs::read_to_string(path).map_err(|e| {
        LicenseError::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    let config: Config = serde_json::from_str(&config_content)
        .map_err(|e| LicenseError::Config(format!("Failed to parse config: {}", e)))?;

    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

fn apply_env_overrides(config: &mut Config, password_hash: Option<String>) {
    if let Some(hash) = password_hash {
        let hash = normalize_hash(&hash);
        if !hash.is_empty() {
            config.password_hash = Some(hash);
        }
    }
}
