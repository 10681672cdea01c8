/// Error taxonomy for token decoding, generation and the activation gate
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LicenseError {
    /// Malformed base64, wrong field count, non-UTF-8 payload
    #[error("invalid format: {0}")]
    Format(String),

    /// Ciphertext length or padding mismatch (wrong key material)
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// Operator input missing or out of range
    #[error("{0}")]
    Validation(String),

    /// Verification call failed or answered not-success
    #[error("{0}")]
    External(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LicenseError {
    /// Message shown to the operator.
    ///
    /// Format and decryption failures are not distinguished here; both mean the
    /// uploaded file was not produced with our key or got corrupted.
    pub fn user_message(&self) -> String {
        match self {
            LicenseError::Format(_) | LicenseError::Decryption(_) => {
                "Invalid token file format".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LicenseError>;
