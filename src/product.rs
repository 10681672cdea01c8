/// Product versions, ordered exactly as the desktop application's enum
use std::fmt;

use crate::error::{LicenseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductVersion {
    Trial,
    Basic,
    Standard,
    Premium,
    Professional,
    Enterprise,
    Full,
}

impl ProductVersion {
    /// All versions in ordinal order (index 0..6)
    pub const ALL: [ProductVersion; 7] = [
        ProductVersion::Trial,
        ProductVersion::Basic,
        ProductVersion::Standard,
        ProductVersion::Premium,
        ProductVersion::Professional,
        ProductVersion::Enterprise,
        ProductVersion::Full,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Name as it appears in license keys and tokens
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductVersion::Trial => "Trial",
            ProductVersion::Basic => "Basic",
            ProductVersion::Standard => "Standard",
            ProductVersion::Premium => "Premium",
            ProductVersion::Professional => "Professional",
            ProductVersion::Enterprise => "Enterprise",
            ProductVersion::Full => "Full",
        }
    }

    /// Parse by ordinal ("2") or case-insensitive name ("standard")
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            return Err(LicenseError::Validation(
                "Please select a product version".to_string(),
            ));
        }

        if let Ok(index) = value.parse::<usize>() {
            return Self::from_index(index).ok_or_else(|| {
                LicenseError::Validation(format!(
                    "Version index {} out of range (0..{})",
                    index,
                    Self::ALL.len() - 1
                ))
            });
        }

        Self::ALL
            .iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(value))
            .copied()
            .ok_or_else(|| LicenseError::Validation(format!("Unknown product version: {}", value)))
    }
}

impl fmt::Display for ProductVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::digest::fixed_length_hash;

    #[test]
    fn test_ordinals_match_desktop_enum() {
        let names: Vec<&str> = ProductVersion::ALL.iter().map(|v| v.as_str()).collect();
        assert_eq!(
            names,
            ["Trial", "Basic", "Standard", "Premium", "Professional", "Enterprise", "Full"]
        );
        for (i, version) in ProductVersion::ALL.iter().enumerate() {
            assert_eq!(version.index(), i);
            assert_eq!(ProductVersion::from_index(i), Some(*version));
        }
        assert_eq!(ProductVersion::from_index(7), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!(ProductVersion::parse("2").unwrap(), ProductVersion::Standard);
        assert_eq!(ProductVersion::parse("standard").unwrap(), ProductVersion::Standard);
        assert_eq!(ProductVersion::parse(" FULL ").unwrap(), ProductVersion::Full);
        assert!(matches!(ProductVersion::parse(""), Err(LicenseError::Validation(_))));
        assert!(matches!(ProductVersion::parse("9"), Err(LicenseError::Validation(_))));
        assert!(matches!(ProductVersion::parse("Ultimate"), Err(LicenseError::Validation(_))));
    }

    #[test]
    fn test_fixed_hashes_do_not_collide() {
        assert_ne!(fixed_length_hash("Trial"), fixed_length_hash("Basic"));
        for (i, a) in ProductVersion::ALL.iter().enumerate() {
            for b in &ProductVersion::ALL[i + 1..] {
                assert_ne!(
                    fixed_length_hash(a.as_str()),
                    fixed_length_hash(b.as_str()),
                    "{} and {} collide",
                    a,
                    b
                );
            }
        }
    }
}
