/// Verification module - the password gate in front of license generation
pub mod fingerprint;
pub mod local;
pub mod network;

pub use fingerprint::local_mac_address;
pub use local::LocalHashVerifier;
pub use network::HttpVerifier;

use crate::error::Result;

/// Outcome of a verification round-trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResponse {
    pub success: bool,
    /// Shown to the operator verbatim when present
    pub message: Option<String>,
}

/// Password gate. Receives the triple hash, never the clear password.
///
/// `Err` means the check could not be performed (transport failure);
/// `Ok` with `success == false` means the password was rejected.
pub trait Verifier {
    fn verify(&self, password_hash: &str) -> Result<VerifyResponse>;
}
