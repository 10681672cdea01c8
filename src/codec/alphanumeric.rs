/// Length-prefixed text codec used to carry the MAC address inside the product id
///
/// Layout before base64: `[len: u32 little-endian][utf-8 bytes]`
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose};
use base64::Engine as _;

use crate::error::{LicenseError, Result};

const PREFIX_LEN: usize = 4;

/// Decoder as forgiving as the browser's `atob`: padding optional, stray
/// trailing bits accepted
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Encode `value` as base64(len_le32 || utf8)
pub fn encode_length_prefixed(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut buffer = Vec::with_capacity(PREFIX_LEN + bytes.len());
    buffer.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    buffer.extend_from_slice(bytes);
    general_purpose::STANDARD.encode(buffer)
}

/// Decode a string produced by [`encode_length_prefixed`]
///
/// Bytes after the declared length are ignored.
pub fn decode_length_prefixed(text: &str) -> Result<String> {
    // atob skips ASCII whitespace anywhere in the input
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let buffer = LENIENT
        .decode(compact)
        .map_err(|e| LicenseError::Format(format!("Base64 decode failed: {}", e)))?;

    if buffer.len() < PREFIX_LEN {
        return Err(LicenseError::Format(format!(
            "Length-prefixed buffer too short: {} bytes",
            buffer.len()
        )));
    }

    let mut prefix = [0u8; PREFIX_LEN];
    prefix.copy_from_slice(&buffer[..PREFIX_LEN]);
    let declared = u32::from_le_bytes(prefix) as usize;

    let end = PREFIX_LEN
        .checked_add(declared)
        .filter(|end| *end <= buffer.len())
        .ok_or_else(|| {
            LicenseError::Format(format!(
                "Declared length {} exceeds payload of {} bytes",
                declared,
                buffer.len() - PREFIX_LEN
            ))
        })?;

    String::from_utf8(buffer[PREFIX_LEN..end].to_vec())
        .map_err(|e| LicenseError::Format(format!("UTF-8 decode failed: {}", e)))
}
