/// One interactive activation session over an uploaded `.token` file
///
/// Flow:
/// 1. Idle → load `.token` → Loaded (or stays where it was on error)
/// 2. Loaded → operator input → Verifying (password gate)
/// 3. Verifying → success → Generating → Done → Loaded
/// 4. Verifying → failure → back to Loaded, token data retained
use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use super::generate::{
    ActivationOutcome, ActivationRequest, build_artifacts, compute_expiry, verify_password,
};
use crate::codec::{MasterSecret, UploadedTokenRecord};
use crate::error::{LicenseError, Result};
use crate::verification::Verifier;

const TOKEN_EXTENSION: &str = "token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loaded,
    Verifying,
    Generating,
    Done,
    Error,
}

pub struct Session<'a> {
    secret: &'a MasterSecret,
    record: Option<UploadedTokenRecord>,
    phase: Phase,
}

impl<'a> Session<'a> {
    pub fn new(secret: &'a MasterSecret) -> Self {
        Self {
            secret,
            record: None,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn record(&self) -> Option<&UploadedTokenRecord> {
        self.record.as_ref()
    }

    fn transition(&mut self, next: Phase) {
        log::debug!("Session {:?} → {:?}", self.phase, next);
        self.phase = next;
    }

    /// State to fall back to after an error
    fn settle(&mut self) {
        self.transition(Phase::Error);
        let resting = if self.record.is_some() {
            Phase::Loaded
        } else {
            Phase::Idle
        };
        self.transition(resting);
    }

    /// Read and parse a `.token` file from disk
    pub fn load_token_file(&mut self, path: &Path) -> Result<&UploadedTokenRecord> {
        let is_token = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(TOKEN_EXTENSION));
        if !is_token {
            return Err(LicenseError::Validation(
                "Please select a valid .token file".to_string(),
            ));
        }

        let bytes = fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.load_token_bytes(&name, &bytes)
    }

    /// Parse uploaded bytes; on failure the previous record is kept
    pub fn load_token_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<&UploadedTokenRecord> {
        match UploadedTokenRecord::parse(bytes, self.secret) {
            Ok(record) => {
                log::info!("Token file loaded: {} (user {})", name, record.user_name);
                self.record = Some(record);
                self.transition(Phase::Loaded);
                self.record
                    .as_ref()
                    .ok_or_else(|| LicenseError::Validation("No token file loaded".to_string()))
            }
            Err(e) => {
                log::warn!("Rejected token file {}: {}", name, e);
                self.settle();
                Err(e)
            }
        }
    }

    /// Verify the password, then generate the new license for the loaded record
    pub fn generate(
        &mut self,
        request: &ActivationRequest,
        verifier: &dyn Verifier,
        today: NaiveDate,
    ) -> Result<ActivationOutcome> {
        let record = self
            .record
            .clone()
            .ok_or_else(|| LicenseError::Validation("Please upload a .token file first".to_string()))?;
        let password = request.validate()?;

        self.transition(Phase::Verifying);
        if let Err(e) = verify_password(verifier, password) {
            log::warn!("Verification failed for {}: {}", record.user_name, e);
            self.settle();
            return Err(e);
        }

        self.transition(Phase::Generating);
        let result = compute_expiry(today, record.remaining, request.requested_days).and_then(
            |expiry| {
                build_artifacts(
                    self.secret,
                    &record.user_name,
                    &record.mac_address,
                    &record.prod_id,
                    request.version,
                    expiry,
                )
            },
        );

        match result {
            Ok(outcome) => {
                self.transition(Phase::Done);
                self.transition(Phase::Loaded);
                Ok(outcome)
            }
            Err(e) => {
                self.settle();
                Err(e)
            }
        }
    }

    /// Discard the loaded record (operator closed the dialog)
    pub fn reset(&mut self) {
        self.record = None;
        self.transition(Phase::Idle);
    }
}
