/// Activation module - offline (`.token` upload) and online (keyed-in) flows
pub mod generate;
pub mod online;
pub mod session;

pub use generate::{ActivationOutcome, ActivationRequest};
pub use online::{OnlineActivation, activate_online};
pub use session::Session;
