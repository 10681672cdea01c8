/// Configuration module - Load and validate activation tool configuration
pub mod loader;
pub mod schema;

pub use loader::load_config;
pub use schema::{Config, VerifyMode};
