use crate::config::logging::secure_log;
use crate::config::parameter;
use crate::error::user_error::UserError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Password assigned on deactivation and reactivation.
pub const DEFAULT_RESET_PASSWORD: &str = "12345678";

/// Reversible encoding used by existing rows. Not a hash.
pub fn encode_legacy(plain: &str) -> String {
    STANDARD.encode(plain.as_bytes())
}

pub fn decode_legacy(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

/// bcrypt reads at most 72 bytes, NUL terminator included.
const BCRYPT_MAX_BYTES: usize = 71;

fn is_bcrypt_hash(stored: &str) -> bool {
    stored.starts_with("$2")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PasswordScheme {
    Legacy,
    Bcrypt,
}

impl PasswordScheme {
    fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "bcrypt" => PasswordScheme::Bcrypt,
            _ => PasswordScheme::Legacy,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PasswordEncoder {
    scheme: PasswordScheme,
    bcrypt_cost: u32,
}

impl PasswordEncoder {
    pub fn new(scheme: PasswordScheme, bcrypt_cost: u32) -> Self {
        Self { scheme, bcrypt_cost }
    }

    /// Reads `PASSWORD_SCHEME` and `BCRYPT_COST`.
    pub fn from_parameters() -> Self {
        let scheme = parameter::get_optional("PASSWORD_SCHEME")
            .map(|name| PasswordScheme::from_name(&name))
            .unwrap_or(PasswordScheme::Legacy);
        let bcrypt_cost = parameter::get_optional("BCRYPT_COST")
            .and_then(|cost| cost.parse::<u32>().ok())
            .unwrap_or(bcrypt::DEFAULT_COST);
        Self::new(scheme, bcrypt_cost)
    }

    pub fn encode(&self, plain: &str) -> Result<String, UserError> {
        match self.scheme {
            PasswordScheme::Legacy => Ok(encode_legacy(plain)),
            PasswordScheme::Bcrypt => {
                if plain.len() > BCRYPT_MAX_BYTES {
                    return Err(UserError::PasswordTooLong);
                }
                bcrypt::non_truncating_hash(plain, self.bcrypt_cost).map_err(|e| {
                    secure_log::secure_error!("Failed to hash password", e);
                    UserError::PasswordEncoding
                })
            }
        }
    }

    /// Exact, case-sensitive comparison. Works for rows written under
    /// either scheme, whatever the configured one is.
    pub fn verify(&self, stored: &str, candidate: &str) -> bool {
        if is_bcrypt_hash(stored) {
            // A longer candidate can never match a bcrypt row.
            if candidate.len() > BCRYPT_MAX_BYTES {
                return false;
            }
            return bcrypt::non_truncating_verify(candidate, stored).unwrap_or_else(|e| {
                secure_log::secure_error!("Password verification system error", e);
                false
            });
        }

        match decode_legacy(stored) {
            Some(plain) => plain == candidate,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_legacy_round_trip_printable(plain in "\\PC*") {
            prop_assert_eq!(decode_legacy(&encode_legacy(&plain)), Some(plain.clone()));
        }

        #[test]
        fn test_legacy_round_trip_ascii(plain in "[ -~]*") {
            prop_assert_eq!(decode_legacy(&encode_legacy(&plain)), Some(plain.clone()));
        }
    }

    #[test]
    fn test_legacy_matches_standard_base64() {
        assert_eq!(encode_legacy("12345678"), "MTIzNDU2Nzg=");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(decode_legacy("not base64!!"), None);
    }

    #[test]
    fn test_verify_is_case_sensitive() {
        let encoder = PasswordEncoder::new(PasswordScheme::Legacy, 4);
        let stored = encoder.encode("Secret").unwrap();

        assert!(encoder.verify(&stored, "Secret"));
        assert!(!encoder.verify(&stored, "secret"));
        assert!(!encoder.verify(&stored, "Secret "));
    }

    #[test]
    fn test_bcrypt_scheme_hashes_and_still_reads_legacy_rows() {
        let encoder = PasswordEncoder::new(PasswordScheme::Bcrypt, 4);
        let stored = encoder.encode("Secret").unwrap();

        assert!(stored.starts_with("$2"));
        assert!(decode_legacy(&stored).is_none());
        assert!(encoder.verify(&stored, "Secret"));
        assert!(!encoder.verify(&stored, "Other"));

        assert!(encoder.verify(&encode_legacy("old-password"), "old-password"));
    }

    #[test]
    fn test_bcrypt_compares_every_byte() {
        let encoder = PasswordEncoder::new(PasswordScheme::Bcrypt, 4);
        let prefix = "a".repeat(BCRYPT_MAX_BYTES);
        let stored = encoder.encode(&prefix).unwrap();

        assert!(encoder.verify(&stored, &prefix));
        assert!(!encoder.verify(&stored, &format!("{}X", prefix)));
        assert!(!encoder.verify(&stored, &format!("{}WRONG", prefix)));
        assert!(matches!(
            encoder.encode(&format!("{}REAL", prefix)),
            Err(UserError::PasswordTooLong)
        ));
    }

    #[test]
    fn test_legacy_scheme_keeps_long_passwords() {
        let encoder = PasswordEncoder::new(PasswordScheme::Legacy, 4);
        let long = format!("{}REAL", "a".repeat(72));
        let stored = encoder.encode(&long).unwrap();

        assert!(encoder.verify(&stored, &long));
        assert!(!encoder.verify(&stored, &format!("{}WRONG", "a".repeat(72))));
    }

    #[test]
    fn test_scheme_names() {
        assert_eq!(PasswordScheme::from_name("BCRYPT"), PasswordScheme::Bcrypt);
        assert_eq!(PasswordScheme::from_name("legacy"), PasswordScheme::Legacy);
        assert_eq!(PasswordScheme::from_name("whatever"), PasswordScheme::Legacy);
    }
}
