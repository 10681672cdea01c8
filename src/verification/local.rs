/// Offline password gate: compare against a provisioned triple hash
use subtle::ConstantTimeEq;

use super::{Verifier, VerifyResponse};
use crate::error::{LicenseError, Result};

pub struct LocalHashVerifier {
    expected_hash: String,
}

impl LocalHashVerifier {
    /// Surrounding whitespace and quotes are stripped, as env-provided
    /// hashes often carry them
    pub fn new(expected_hash: &str) -> Result<Self> {
        let expected_hash = normalize_hash(expected_hash);
        if expected_hash.is_empty() {
            return Err(LicenseError::Config("password_hash cannot be empty".to_string()));
        }
        Ok(Self { expected_hash })
    }
}

pub fn normalize_hash(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string()
}

impl Verifier for LocalHashVerifier {
    fn verify(&self, password_hash: &str) -> Result<VerifyResponse> {
        let matches: bool = self
            .expected_hash
            .as_bytes()
            .ct_eq(password_hash.as_bytes())
            .into();

        Ok(VerifyResponse {
            success: matches,
            message: if matches {
                None
            } else {
                Some("Invalid password".to_string())
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::triple_sha256;

    #[test]
    fn test_matching_hash() {
        let verifier = LocalHashVerifier::new(&triple_sha256("hunter2")).unwrap();
        let response = verifier.verify(&triple_sha256("hunter2")).unwrap();
        assert!(response.success);
        assert!(response.message.is_none());
    }

    #[test]
    fn test_mismatch() {
        let verifier = LocalHashVerifier::new(&triple_sha256("hunter2")).unwrap();

        let response = verifier.verify(&triple_sha256("hunter3")).unwrap();
        assert!(!response.success);
        assert_eq!(response.message.as_deref(), Some("Invalid password"));

        // Truncated or extended hashes are rejected
        let hash = triple_sha256("hunter2");
        assert!(!verifier.verify(&hash[..63]).unwrap().success);
        assert!(!verifier.verify(&format!("{}0", hash)).unwrap().success);
    }

    #[test]
    fn test_quoted_hash_is_normalized() {
        let hash = triple_sha256("pw");
        let verifier = LocalHashVerifier::new(&format!("  \"{}\"\n", hash)).unwrap();
        assert!(verifier.verify(&hash).unwrap().success);

        assert!(LocalHashVerifier::new("  ''  ").is_err());
    }
}
