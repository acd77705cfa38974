//! Station code types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Maximum length of a Digitraffic station short code.
const MAX_CODE_CHARS: usize = 6;

/// Error returned when parsing an invalid station short code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A valid Digitraffic station short code (e.g. `HKI`, `TPE`, `KÄP`).
///
/// Short codes are 1-6 uppercase letters. Finnish letters (Ä, Ö, Å) occur
/// in real codes, so any uppercase alphabetic character is accepted.
///
/// # Examples
///
/// ```
/// use juna_server::domain::StationCode;
///
/// let hki = StationCode::parse("HKI").unwrap();
/// assert_eq!(hki.as_str(), "HKI");
///
/// // Lowercase is rejected unless normalized first
/// assert!(StationCode::parse("hki").is_err());
/// assert_eq!(StationCode::parse_normalized("hki").unwrap(), hki);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode(Box<str>);

impl StationCode {
    /// Parse a station code. The input must already be uppercase.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let len = s.chars().count();
        if len == 0 || len > MAX_CODE_CHARS {
            return Err(InvalidStationCode {
                reason: "must be 1-6 characters",
            });
        }

        if !s.chars().all(|c| c.is_alphabetic() && c.is_uppercase()) {
            return Err(InvalidStationCode {
                reason: "must be uppercase letters",
            });
        }

        Ok(Self(s.into()))
    }

    /// Parse a station code after trimming and uppercasing the input.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStationCode> {
        Self::parse(&s.trim().to_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.0)
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for StationCode {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl Serialize for StationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for StationCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        StationCode::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(StationCode::parse("HKI").is_ok());
        assert!(StationCode::parse("PSL").is_ok());
        assert!(StationCode::parse("KÄP").is_ok());
        assert!(StationCode::parse("Y").is_ok());
        assert!(StationCode::parse("ABCDEF").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(StationCode::parse("hki").is_err());
        assert!(StationCode::parse("Hki").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(StationCode::parse("").is_err());
        assert!(StationCode::parse("ABCDEFG").is_err());
    }

    #[test]
    fn reject_non_letters() {
        assert!(StationCode::parse("H1I").is_err());
        assert!(StationCode::parse("H-I").is_err());
        assert!(StationCode::parse("H I").is_err());
    }

    #[test]
    fn parse_normalized_uppercases_and_trims() {
        let code = StationCode::parse_normalized(" käp ").unwrap();
        assert_eq!(code.as_str(), "KÄP");
    }

    #[test]
    fn display_and_debug() {
        let code = StationCode::parse("TPE").unwrap();
        assert_eq!(format!("{}", code), "TPE");
        assert_eq!(format!("{:?}", code), "StationCode(TPE)");
    }

    #[test]
    fn serde_roundtrip_validates() {
        let code: StationCode = serde_json::from_str("\"HKI\"").unwrap();
        assert_eq!(code.as_str(), "HKI");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"HKI\"");
        assert!(serde_json::from_str::<StationCode>("\"hki\"").is_err());
    }
}
