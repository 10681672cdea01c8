/// Pipe-delimited token payloads encrypted under the static master secret
///
/// - license token: `licenseKey|expiryDate|version|productId`, base64 of ciphertext
/// - user token (`.slic`): `username|<license token>`, raw ciphertext bytes
/// - uploaded token (`.token`): `userName|phone|transId|prodId|remaining`, raw ciphertext bytes
use base64::{Engine as _, engine::general_purpose};

use super::alphanumeric::{decode_length_prefixed, encode_length_prefixed};
use super::cipher::MasterSecret;
use crate::error::{LicenseError, Result};

const DELIMITER: char = '|';

fn join_fields(fields: &[(&str, &str)]) -> Result<String> {
    for (name, value) in fields {
        if value.contains(DELIMITER) {
            return Err(LicenseError::Validation(format!(
                "{} must not contain '{}'",
                name, DELIMITER
            )));
        }
    }
    Ok(fields
        .iter()
        .map(|(_, value)| *value)
        .collect::<Vec<_>>()
        .join("|"))
}

fn split_fields<const N: usize>(plaintext: &str, what: &str) -> Result<[String; N]> {
    let parts: Vec<String> = plaintext.split(DELIMITER).map(str::to_string).collect();
    let count = parts.len();
    parts.try_into().map_err(|_| {
        LicenseError::Format(format!("{} expects {} fields, got {}", what, N, count))
    })
}

/// Payload embedded (base64) inside the user token
/// Leading integer of a `remaining` field, 0 when there is none
///
/// The desktop application writes values like "30", "30 days" or "30.5";
/// only the optional sign and leading digits count. A `0x` prefix reads as hex.
fn parse_remaining(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let end = rest
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        if !raw.trim().is_empty() {
            log::debug!("Remaining days field has no leading integer, using 0");
        }
        return 0;
    }

    // Saturate; compute_expiry rejects the out-of-range total
    let magnitude = i64::from_str_radix(digits, radix).unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseToken {
    pub license_key: String,
    pub expiry_date: String,
    pub version: String,
    pub product_id: String,
}

impl LicenseToken {
    /// Encrypt and base64-encode
    pub fn pack(&self, secret: &MasterSecret) -> Result<String> {
        let plaintext = join_fields(&[
            ("license key", self.license_key.as_str()),
            ("expiry date", self.expiry_date.as_str()),
            ("version", self.version.as_str()),
            ("product id", self.product_id.as_str()),
        ])?;
        Ok(general_purpose::STANDARD.encode(secret.seal(&plaintext)))
    }

    pub fn unpack(text: &str, secret: &MasterSecret) -> Result<Self> {
        let ciphertext = general_purpose::STANDARD
            .decode(text.trim())
            .map_err(|e| LicenseError::Format(format!("Base64 decode failed: {}", e)))?;
        let plaintext = secret.open(&ciphertext)?;
        let [license_key, expiry_date, version, product_id] =
            split_fields::<4>(&plaintext, "license token")?;
        Ok(Self {
            license_key,
            expiry_date,
            version,
            product_id,
        })
    }
}

/// The distributable `.slic` artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserToken {
    pub username: String,
    pub license_token: String,
}

impl UserToken {
    /// Raw ciphertext bytes, written to disk as-is
    pub fn pack(&self, secret: &MasterSecret) -> Result<Vec<u8>> {
        let plaintext = join_fields(&[
            ("username", self.username.as_str()),
            ("license token", self.license_token.as_str()),
        ])?;
        Ok(secret.seal(&plaintext))
    }

    pub fn unpack(bytes: &[u8], secret: &MasterSecret) -> Result<Self> {
        let plaintext = secret.open(bytes)?;
        let [username, license_token] = split_fields::<2>(&plaintext, "user token")?;
        Ok(Self {
            username,
            license_token,
        })
    }
}

/// Decoded `.token` activation request from the desktop application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedTokenRecord {
    pub user_name: String,
    pub phone: String,
    pub trans_id: String,
    pub prod_id: String,
    /// Days left on the current license
    pub remaining: i64,
    /// Recovered from `prod_id`
    pub mac_address: String,
}

impl UploadedTokenRecord {
    /// Build a request the way the desktop application does, with the MAC
    /// embedded as the product id
    pub fn new(
        user_name: &str,
        phone: &str,
        trans_id: &str,
        mac_address: &str,
        remaining: i64,
    ) -> Self {
        Self {
            user_name: user_name.to_string(),
            phone: phone.to_string(),
            trans_id: trans_id.to_string(),
            prod_id: encode_length_prefixed(mac_address),
            remaining,
            mac_address: mac_address.to_string(),
        }
    }

    /// Decrypt and split an uploaded `.token` file
    pub fn parse(bytes: &[u8], secret: &MasterSecret) -> Result<Self> {
        let plaintext = secret.open(bytes)?;
        Self::from_plaintext(&plaintext)
    }

    fn from_plaintext(plaintext: &str) -> Result<Self> {
        let [user_name, phone, trans_id, prod_id, remaining] =
            split_fields::<5>(plaintext, "token file")?;

        let remaining = parse_remaining(&remaining);
        let mac_address = decode_length_prefixed(&prod_id)?;

        Ok(Self {
            user_name,
            phone,
            trans_id,
            prod_id,
            remaining,
            mac_address,
        })
    }

    /// Inverse of [`UploadedTokenRecord::parse`]
    pub fn seal(&self, secret: &MasterSecret) -> Result<Vec<u8>> {
        let remaining = self.remaining.to_string();
        let plaintext = join_fields(&[
            ("user name", self.user_name.as_str()),
            ("phone", self.phone.as_str()),
            ("transaction id", self.trans_id.as_str()),
            ("product id", self.prod_id.as_str()),
            ("remaining", remaining.as_str()),
        ])?;
        Ok(secret.seal(&plaintext))
    }
}
