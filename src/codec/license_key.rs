/// Human-readable license key: `<hash(mac)>-<hash(version)>-<enc(expiry)>`
///
/// Write-only. The desktop application recomputes and compares it, nothing
/// here decodes it.
use std::fmt;

use super::cipher::encrypt_expiry_date;
use super::digest::fixed_length_hash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseKey {
    pub hashed_mac: String,
    pub hashed_version: String,
    pub encrypted_expiry: String,
}

impl LicenseKey {
    pub fn generate(mac_address: &str, version: &str, expiry_date: &str) -> Self {
        Self {
            hashed_mac: fixed_length_hash(mac_address),
            hashed_version: fixed_length_hash(version),
            encrypted_expiry: encrypt_expiry_date(expiry_date, mac_address),
        }
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.hashed_mac, self.hashed_version, self.encrypted_expiry)
    }
}

pub fn generate_license_key(mac_address: &str, version: &str, expiry_date: &str) -> String {
    LicenseKey::generate(mac_address, version, expiry_date).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_lower_hex8(segment: &str) -> bool {
        segment.len() == 8
            && segment
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    #[test]
    fn test_reference_scenario() {
        let key = generate_license_key("AA:BB:CC:DD:EE:FF", "Standard", "2025-06-01");
        assert_eq!(key, "261900fb-ef669154-rbj+sqy2rXVMKpPPL2p5tQ==");

        let again = generate_license_key("AA:BB:CC:DD:EE:FF", "Standard", "2025-06-01");
        assert_eq!(key, again);
    }

    #[test]
    fn test_three_segments() {
        for (mac, version, expiry) in [
            ("AA:BB:CC:DD:EE:FF", "Trial", "2030-12-31"),
            ("00-1A-2B-3C-4D-5E", "Enterprise", "2024-01-01"),
            ("", "Full", ""),
        ] {
            let key = generate_license_key(mac, version, expiry);
            let parts: Vec<&str> = key.splitn(3, '-').collect();
            assert_eq!(parts.len(), 3);
            assert_eq!(key.matches('-').count(), 2, "base64 never contains '-': {}", key);
            assert!(is_lower_hex8(parts[0]));
            assert!(is_lower_hex8(parts[1]));
            assert!(!parts[2].is_empty());
            assert!(
                parts[2]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=')
            );
        }
    }

    #[test]
    fn test_expiry_segment_depends_on_mac() {
        let a = LicenseKey::generate("AA:BB:CC:DD:EE:FF", "Basic", "2025-06-01");
        let b = LicenseKey::generate("AA:BB:CC:DD:EE:00", "Basic", "2025-06-01");
        assert_eq!(a.hashed_version, b.hashed_version);
        assert_ne!(a.hashed_mac, b.hashed_mac);
        assert_ne!(a.encrypted_expiry, b.encrypted_expiry);
    }
}
