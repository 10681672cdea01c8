/// License token codec - digests, the length-prefixed MAC encoding, AES-CBC
/// and the pipe-delimited token layouts shared with the desktop application
pub mod alphanumeric;
pub mod cipher;
pub mod digest;
pub mod license_key;
pub mod token;

pub use alphanumeric::encode_length_prefixed;
pub use cipher::MasterSecret;
pub use digest::triple_sha256;
pub use license_key::generate_license_key;
pub use token::{LicenseToken, UploadedTokenRecord, UserToken};
