/// License generation: expiry arithmetic, the password gate and the three
/// generated artifacts (license key, license token, `.slic` user token)
use chrono::{Days, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::{LicenseToken, MasterSecret, UserToken, generate_license_key, triple_sha256};
use crate::error::{LicenseError, Result};
use crate::product::ProductVersion;
use crate::verification::Verifier;

/// Date layout shared with the desktop application
pub const EXPIRY_FORMAT: &str = "%Y-%m-%d";

/// Operator input for one activation
#[derive(Clone)]
pub struct ActivationRequest {
    pub password: Option<String>,
    pub requested_days: i64,
    pub version: ProductVersion,
}

impl std::fmt::Debug for ActivationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationRequest")
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("requested_days", &self.requested_days)
            .field("version", &self.version)
            .finish()
    }
}

impl ActivationRequest {
    /// Password present and days positive
    pub fn validate(&self) -> Result<&str> {
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| LicenseError::Validation("Please enter the master password".to_string()))?;

        if self.requested_days <= 0 {
            return Err(LicenseError::Validation("Please enter requested days".to_string()));
        }

        Ok(password)
    }
}

/// Everything produced by a successful activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationOutcome {
    pub username: String,
    pub license_key: String,
    pub expiry_date: NaiveDate,
    pub version: ProductVersion,
    /// Base64 license token embedded in the user token
    pub license_token: String,
    /// Raw `.slic` bytes
    pub user_token: Vec<u8>,
}

impl ActivationOutcome {
    /// `<userName>_license.slic`, with path separators replaced
    pub fn file_name(&self) -> String {
        let safe: String = self
            .username
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{}_license.slic", safe)
    }

    /// Expiry as shown to the operator, e.g. "1 June 2025"
    pub fn expiry_display(&self) -> String {
        self.expiry_date.format("%-d %B %Y").to_string()
    }

    /// Write the `.slic` artifact into `dir`
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, &self.user_token)?;
        log::info!("Wrote {} ({} bytes)", path.display(), self.user_token.len());
        Ok(path)
    }
}

/// `today + remaining + requested` days
pub fn compute_expiry(today: NaiveDate, remaining: i64, requested: i64) -> Result<NaiveDate> {
    let total = remaining
        .checked_add(requested)
        .ok_or_else(|| LicenseError::Validation("Requested days out of range".to_string()))?;

    let shifted = if total >= 0 {
        today.checked_add_days(Days::new(total as u64))
    } else {
        today.checked_sub_days(Days::new(total.unsigned_abs()))
    };

    shifted.ok_or_else(|| LicenseError::Validation("Expiry date out of range".to_string()))
}

/// Hash the password and ask the verifier; any non-success stops generation
pub fn verify_password(verifier: &dyn Verifier, password: &str) -> Result<()> {
    let response = verifier.verify(&triple_sha256(password))?;
    if response.success {
        Ok(())
    } else {
        Err(LicenseError::External(
            response
                .message
                .unwrap_or_else(|| "Invalid master password!".to_string()),
        ))
    }
}

/// Run the key, license token and user token generators
pub fn build_artifacts(
    secret: &MasterSecret,
    username: &str,
    mac_address: &str,
    product_id: &str,
    version: ProductVersion,
    expiry_date: NaiveDate,
) -> Result<ActivationOutcome> {
    let expiry = expiry_date.format(EXPIRY_FORMAT).to_string();

    let license_key = generate_license_key(mac_address, version.as_str(), &expiry);

    let license_token = LicenseToken {
        license_key: license_key.clone(),
        expiry_date: expiry,
        version: version.as_str().to_string(),
        product_id: product_id.to_string(),
    }
    .pack(secret)?;

    let user_token = UserToken {
        username: username.to_string(),
        license_token: license_token.clone(),
    }
    .pack(secret)?;

    log::debug!(
        "Generated {} license for {} expiring {}",
        version,
        username,
        expiry_date
    );

    Ok(ActivationOutcome {
        username: username.to_string(),
        license_key,
        expiry_date,
        version,
        license_token,
        user_token,
    })
}
