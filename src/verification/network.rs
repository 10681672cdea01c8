/// Remote password verification against the activation API
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Verifier, VerifyResponse};
use crate::error::{LicenseError, Result};

/// Verification request payload
#[derive(Serialize)]
struct VerifyRequest<'a> {
    /// Triple SHA-256 hash, never the clear password
    password: &'a str,
}

/// Raw response body; the endpoint answers 401 with the same shape
#[derive(Deserialize)]
struct VerifyBody {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}

/// `POST {api_base_url}/verify`
pub struct HttpVerifier {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpVerifier {
    pub fn new(api_base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(false)
            .build()
            .map_err(|e| LicenseError::External(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: verify_url(api_base_url),
            client,
        })
    }
}

/// Append the verify path to the base URL unless it is already there
fn verify_url(api_base_url: &str) -> String {
    let clean_url = api_base_url.trim_end_matches('/');
    if clean_url.ends_with("/verify") {
        clean_url.to_string()
    } else {
        format!("{}/verify", clean_url)
    }
}

impl Verifier for HttpVerifier {
    fn verify(&self, password_hash: &str) -> Result<VerifyResponse> {
        log::debug!("POST {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&VerifyRequest {
                password: password_hash,
            })
            .send()
            .map_err(|e| LicenseError::External(format!("Verification request failed: {}", e)))?;

        let status = response.status();
        log::debug!("Verification response status: {}", status);

        match response.json::<VerifyBody>() {
            Ok(body) => Ok(VerifyResponse {
                success: body.success && status.is_success(),
                message: body.message,
            }),
            Err(e) if status.is_success() => Err(LicenseError::External(format!(
                "Failed to parse verification response: {}",
                e
            ))),
            Err(_) => Ok(VerifyResponse {
                success: false,
                message: Some(format!("HTTP error {}", status)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_request_serialization() {
        let req = VerifyRequest { password: "abc123" };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"password":"abc123"}"#);
    }

    #[test]
    fn test_verify_body_parsing() {
        let ok: VerifyBody = serde_json::from_str(r#"{"success":true,"hash":"abc"}"#).unwrap();
        assert!(ok.success);
        assert!(ok.message.is_none());

        let denied: VerifyBody = serde_json::from_str(
            r#"{"success":false,"message":"Invalid password","debug":{"receivedPrefix":"abcd"}}"#,
        )
        .unwrap();
        assert!(!denied.success);
        assert_eq!(denied.message.as_deref(), Some("Invalid password"));

        // 500 body carries no success flag
        let error: VerifyBody =
            serde_json::from_str(r#"{"error":"Internal server error"}"#).unwrap();
        assert!(!error.success);
    }

    #[test]
    fn test_verify_url() {
        assert_eq!(verify_url("http://localhost:3000/api"), "http://localhost:3000/api/verify");
        assert_eq!(verify_url("https://example.com/api/"), "https://example.com/api/verify");
        assert_eq!(verify_url("https://example.com/api/verify"), "https://example.com/api/verify");
    }
}
