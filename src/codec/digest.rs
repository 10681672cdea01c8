/// SHA-256 helpers shared by the license key generator and the password gate
use sha2::{Digest, Sha256};

/// Raw 32-byte SHA-256 digest
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Lowercase hex SHA-256 of the UTF-8 bytes of `input`
pub fn sha256_hex(input: &str) -> String {
    hex::encode(sha256(input.as_bytes()))
}

/// Hash a password three times, re-hashing the lowercase hex string each round
///
/// This is what the verification endpoint compares against its stored hash.
/// Each round hashes the 64-character hex text of the previous round, not the
/// raw digest bytes.
pub fn triple_sha256(password: &str) -> String {
    let mut hash = password.to_string();
    for _ in 0..3 {
        hash = sha256_hex(&hash);
    }
    hash
}

/// First 8 hex characters of the SHA-256 of `input`
///
/// Used as a compact identifier for MAC addresses and product versions
/// inside the license key.
pub fn fixed_length_hash(input: &str) -> String {
    let mut hash = sha256_hex(input);
    hash.truncate(8);
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_answers() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_triple_hash_chains_over_hex() {
        assert_eq!(
            triple_sha256("abc"),
            "bbdb08dd3f8e0a2dbd9a4f45045fdf45cebee1ac6706de3353e753234b318e78"
        );
        assert_eq!(
            triple_sha256("abc"),
            sha256_hex(&sha256_hex(&sha256_hex("abc")))
        );

        // Hashing raw bytes between rounds would give a different chain
        let raw_chain = hex::encode(sha256(&sha256(&sha256(b"abc"))));
        assert_ne!(triple_sha256("abc"), raw_chain);
    }

    #[test]
    fn test_fixed_length_hash() {
        let hash = fixed_length_hash("AA:BB:CC:DD:EE:FF");
        assert_eq!(hash, "261900fb");
        assert_eq!(hash.len(), 8);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        // Pure function
        assert_eq!(fixed_length_hash("Standard"), fixed_length_hash("Standard"));
        assert_eq!(fixed_length_hash("Standard"), "ef669154");
    }
}
