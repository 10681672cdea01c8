/// AES-256-CBC with PKCS#7 padding under the two key regimes the legacy
/// license manager understands
use aes::Aes256;
use base64::{Engine as _, engine::general_purpose};
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};

use super::digest::sha256;
use crate::error::{LicenseError, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;
const BLOCK_LEN: usize = 16;

/// Shared key string baked into the desktop application
pub const BASE_KEY_STRING: &str = "SBAProMasterSecretKey2023!@#$%^&*()";
/// Shared IV string baked into the desktop application
pub const BASE_IV_STRING: &str = "SBAProIV20231234!";

/// Static key material for `.token` and `.slic` payloads
///
/// Built once at startup and shared read-only.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterSecret {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl MasterSecret {
    /// Derive key and IV from their string forms
    ///
    /// Strings are truncated or zero-padded to 32/16 bytes. They are not hashed.
    pub fn from_strings(key: &str, iv: &str) -> Self {
        Self {
            key: truncate_or_pad(key.as_bytes()),
            iv: truncate_or_pad(iv.as_bytes()),
        }
    }

    /// Encrypt under the static key/IV
    pub fn seal(&self, plaintext: &str) -> Vec<u8> {
        encrypt(plaintext, &self.key, &self.iv)
    }

    /// Decrypt under the static key/IV
    pub fn open(&self, ciphertext: &[u8]) -> Result<String> {
        decrypt(ciphertext, &self.key, &self.iv)
    }
}

impl Default for MasterSecret {
    fn default() -> Self {
        Self::from_strings(BASE_KEY_STRING, BASE_IV_STRING)
    }
}

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterSecret(<redacted>)")
    }
}

fn truncate_or_pad<const N: usize>(source: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    let len = source.len().min(N);
    out[..len].copy_from_slice(&source[..len]);
    out
}

/// Key/IV for the expiry-date field: SHA-256 of the MAC and an all-zero IV
///
/// The zero IV is part of the legacy format. A random IV here makes the
/// license key unreadable by the desktop application.
pub fn mac_derived_key(mac_address: &str) -> ([u8; KEY_LEN], [u8; IV_LEN]) {
    (sha256(mac_address.as_bytes()), [0u8; IV_LEN])
}

pub fn encrypt(plaintext: &str, key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Vec<u8> {
    Aes256CbcEnc::new(key.into(), iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes())
}

pub fn decrypt(ciphertext: &[u8], key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Result<String> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(LicenseError::Decryption(format!(
            "Ciphertext length {} is not a positive multiple of {}",
            ciphertext.len(),
            BLOCK_LEN
        )));
    }

    let plaintext = Aes256CbcDec::new(key.into(), iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| LicenseError::Decryption("Invalid padding".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|e| LicenseError::Format(format!("Decrypted payload is not UTF-8: {}", e)))
}

/// Base64 of the expiry date encrypted under the MAC-derived key
pub fn encrypt_expiry_date(expiry_date: &str, mac_address: &str) -> String {
    let (key, iv) = mac_derived_key(mac_address);
    general_purpose::STANDARD.encode(encrypt(expiry_date, &key, &iv))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_secret_derivation() {
        let secret = MasterSecret::default();
        assert_eq!(&secret.key, b"SBAProMasterSecretKey2023!@#$%^&");
        assert_eq!(&secret.iv, b"SBAProIV20231234");

        let short = MasterSecret::from_strings("abc", "iv");
        assert_eq!(&short.key[..3], b"abc");
        assert!(short.key[3..].iter().all(|&b| b == 0));
        assert_eq!(&short.iv[..2], b"iv");
        assert!(short.iv[2..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_static_mode_known_answer() {
        let secret = MasterSecret::default();
        assert_eq!(
            hex::encode(secret.seal("alice|abc123")),
            "9718c02567c09a26489428fa4a7c6d7f"
        );
        assert_eq!(
            general_purpose::STANDARD.encode(secret.seal("hello")),
            "gW6X6wNskH6sIAGSaB++Vw=="
        );
    }

    #[test]
    fn test_round_trip() {
        let secret = MasterSecret::default();
        for plaintext in ["", "x", "exactly 16 bytes", "bob|555-1234|TX99|abc|30", "ünïcødé"] {
            assert_eq!(secret.open(&secret.seal(plaintext)).unwrap(), plaintext);
        }

        let (key, iv) = mac_derived_key("AA:BB:CC:DD:EE:FF");
        let ciphertext = encrypt("2025-06-01", &key, &iv);
        assert_eq!(decrypt(&ciphertext, &key, &iv).unwrap(), "2025-06-01");
    }

    #[test]
    fn test_expiry_encryption_is_deterministic() {
        let first = encrypt_expiry_date("2025-06-01", "AA:BB:CC:DD:EE:FF");
        let second = encrypt_expiry_date("2025-06-01", "AA:BB:CC:DD:EE:FF");
        assert_eq!(first, second);
        assert_eq!(first, "rbj+sqy2rXVMKpPPL2p5tQ==");

        let (_, iv) = mac_derived_key("anything");
        assert_eq!(iv, [0u8; IV_LEN]);
    }

    #[test]
    fn test_rejects_unaligned_ciphertext() {
        let secret = MasterSecret::default();
        assert!(matches!(secret.open(&[0u8; 15]), Err(LicenseError::Decryption(_))));
        assert!(matches!(secret.open(&[0u8; 17]), Err(LicenseError::Decryption(_))));
        assert!(matches!(secret.open(&[]), Err(LicenseError::Decryption(_))));
    }

    #[test]
    fn test_wrong_key_fails() {
        let ciphertext = MasterSecret::default().seal("userName|phone|trans|prod|30");
        let other = MasterSecret::from_strings("another key entirely", "another iv");
        assert!(other.open(&ciphertext).is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let rendered = format!("{:?}", MasterSecret::default());
        assert!(!rendered.contains("SBAPro"));
    }
}
