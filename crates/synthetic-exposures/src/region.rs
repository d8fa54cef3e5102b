//! Region (country) codes.
//!
//! Regions are identified by two-letter ISO 3166-1 alpha-2 style codes such
//! as `DE` or `FR`. Input is normalised to uppercase so configuration values
//! like `"de, fr"` resolve to the same regions as `"DE,FR"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::RegionCodeError;

const REGION_CODE_LEN: usize = 2;

/// A validated, uppercase two-letter region code.
///
/// # Examples
///
/// ```
/// use synthetic_exposures::RegionCode;
///
/// let region: RegionCode = "de".parse().expect("valid region");
/// assert_eq!(region.as_str(), "DE");
/// assert!("DEU".parse::<RegionCode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionCode([u8; REGION_CODE_LEN]);

impl RegionCode {
    /// Parses and normalises a region code.
    ///
    /// # Errors
    ///
    /// Returns [`RegionCodeError::Invalid`] unless the trimmed input is
    /// exactly two ASCII letters.
    pub fn new(value: &str) -> Result<Self, RegionCodeError> {
        let trimmed = value.trim();
        let invalid = || RegionCodeError::Invalid {
            value: value.to_owned(),
        };
        let bytes: [u8; REGION_CODE_LEN] = trimmed.as_bytes().try_into().map_err(|_| invalid())?;
        if !bytes.iter().all(u8::is_ascii_alphabetic) {
            return Err(invalid());
        }
        Ok(Self(bytes.map(|b| b.to_ascii_uppercase())))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionCode {
    type Err = RegionCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for RegionCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RegionCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parses a comma-separated region list such as `"DE,FR"`.
///
/// Entries are trimmed and blank entries skipped. Duplicates are dropped,
/// keeping the first occurrence so configuration order is preserved. An empty
/// result is not an error here; callers decide whether regions are required.
///
/// # Errors
///
/// Returns [`RegionCodeError`] for the first malformed entry.
///
/// # Examples
///
/// ```
/// use synthetic_exposures::parse_region_list;
///
/// let regions = parse_region_list("fr, DE,,FR").expect("valid list");
/// let codes: Vec<&str> = regions.iter().map(|r| r.as_str()).collect();
/// assert_eq!(codes, ["FR", "DE"]);
/// ```
pub fn parse_region_list(raw: &str) -> Result<Vec<RegionCode>, RegionCodeError> {
    let mut regions: Vec<RegionCode> = Vec::new();
    for entry in raw.split(',').filter(|entry| !entry.trim().is_empty()) {
        let region = RegionCode::new(entry)?;
        if !regions.contains(&region) {
            regions.push(region);
        }
    }
    Ok(regions)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("DE", "DE")]
    #[case("fr", "FR")]
    #[case(" it ", "IT")]
    fn accepts_two_letter_codes(#[case] input: &str, #[case] expected: &str) {
        let region = RegionCode::new(input).expect("valid region");
        assert_eq!(region.as_str(), expected);
        assert_eq!(region.to_string(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::too_short("D")]
    #[case::too_long("DEU")]
    #[case::digits("D1")]
    #[case::non_ascii("DÉ")]
    fn rejects_malformed_codes(#[case] input: &str) {
        assert_eq!(
            RegionCode::new(input),
            Err(RegionCodeError::Invalid {
                value: input.to_owned()
            })
        );
    }

    #[test]
    fn list_parsing_preserves_order_and_drops_duplicates() {
        let regions = parse_region_list("DE, fr ,de,IT").expect("valid list");
        let codes: Vec<_> = regions.iter().map(RegionCode::as_str).collect();
        assert_eq!(codes, ["DE", "FR", "IT"]);
    }

    #[test]
    fn list_parsing_of_blank_input_is_empty() {
        assert_eq!(parse_region_list(" , ,"), Ok(Vec::new()));
    }

    #[test]
    fn list_parsing_reports_first_bad_entry() {
        assert_eq!(
            parse_region_list("DE,XYZ,Q"),
            Err(RegionCodeError::Invalid {
                value: "XYZ".to_owned()
            })
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let region = RegionCode::new("de").expect("valid region");
        let json = serde_json::to_string(&region).expect("serialize");
        assert_eq!(json, "\"DE\"");
        let parsed: RegionCode = serde_json::from_str("\"fr\"").expect("deserialize");
        assert_eq!(parsed.as_str(), "FR");
    }

    #[test]
    fn deserialization_rejects_malformed_code() {
        let result = serde_json::from_str::<RegionCode>("\"FRA\"");
        assert!(result.is_err());
    }
}
