/// Online activation: the operator keys in the machine details directly,
/// no `.token` upload involved
use chrono::NaiveDate;

use super::generate::{
    ActivationOutcome, ActivationRequest, build_artifacts, compute_expiry, verify_password,
};
use crate::codec::{MasterSecret, encode_length_prefixed};
use crate::error::{LicenseError, Result};
use crate::verification::Verifier;

#[derive(Debug, Clone)]
pub struct OnlineActivation {
    pub mac_address: String,
    pub username: String,
    /// Defaults to the length-prefixed encoding of the MAC
    pub product_id: Option<String>,
    pub request: ActivationRequest,
}

impl OnlineActivation {
    fn product_id(&self) -> String {
        self.product_id
            .clone()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| encode_length_prefixed(&self.mac_address))
    }
}

pub fn activate_online(
    secret: &MasterSecret,
    verifier: &dyn Verifier,
    activation: &OnlineActivation,
    today: NaiveDate,
) -> Result<ActivationOutcome> {
    if activation.mac_address.trim().is_empty() {
        return Err(LicenseError::Validation("Please enter the MAC address".to_string()));
    }
    if activation.username.trim().is_empty() {
        return Err(LicenseError::Validation("Please enter the user name".to_string()));
    }
    let password = activation.request.validate()?;

    verify_password(verifier, password)?;

    let expiry = compute_expiry(today, 0, activation.request.requested_days)?;
    build_artifacts(
        secret,
        &activation.username,
        &activation.mac_address,
        &activation.product_id(),
        activation.request.version,
        expiry,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::alphanumeric::decode_length_prefixed;
    use crate::codec::{LicenseToken, UserToken, triple_sha256};
    use crate::product::ProductVersion;
    use crate::verification::LocalHashVerifier;

    fn activation(password: &str) -> OnlineActivation {
        OnlineActivation {
            mac_address: "AA:BB:CC:DD:EE:FF".to_string(),
            username: "alice".to_string(),
            product_id: None,
            request: ActivationRequest {
                password: Some(password.to_string()),
                requested_days: 30,
                version: ProductVersion::Standard,
            },
        }
    }

    #[test]
    fn test_online_activation() {
        let secret = MasterSecret::default();
        let verifier = LocalHashVerifier::new(&triple_sha256("master")).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();

        let outcome = activate_online(&secret, &verifier, &activation("master"), today).unwrap();
        assert_eq!(outcome.license_key, "261900fb-ef669154-rbj+sqy2rXVMKpPPL2p5tQ==");

        let user = UserToken::unpack(&outcome.user_token, &secret).unwrap();
        let license = LicenseToken::unpack(&user.license_token, &secret).unwrap();
        assert_eq!(decode_length_prefixed(&license.product_id).unwrap(), "AA:BB:CC:DD:EE:FF");
    }

    #[test]
    fn test_explicit_product_id_passes_through() {
        let secret = MasterSecret::default();
        let verifier = LocalHashVerifier::new(&triple_sha256("master")).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();

        let mut input = activation("master");
        input.product_id = Some("PROD-0001".to_string());
        let outcome = activate_online(&secret, &verifier, &input, today).unwrap();

        let user = UserToken::unpack(&outcome.user_token, &secret).unwrap();
        let license = LicenseToken::unpack(&user.license_token, &secret).unwrap();
        assert_eq!(license.product_id, "PROD-0001");
    }

    #[test]
    fn test_wrong_password_generates_nothing() {
        let secret = MasterSecret::default();
        let verifier = LocalHashVerifier::new(&triple_sha256("master")).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();

        let err = activate_online(&secret, &verifier, &activation("guess"), today).unwrap_err();
        assert!(matches!(err, LicenseError::External(_)));

        let mut blank = activation("master");
        blank.mac_address = " ".to_string();
        assert!(matches!(
            activate_online(&secret, &verifier, &blank, today),
            Err(LicenseError::Validation(_))
        ));
    }
}
