//! Station identifier type.

use std::fmt;

/// Error returned when parsing an invalid station ID.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station ID: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A TRA station identifier as used by the TDX API.
///
/// TRA station IDs are short strings of ASCII digits (e.g. `1000` for
/// Taipei, `0900` for Keelung). Leading zeroes are significant, so the
/// code is kept as a string rather than parsed to a number. This type
/// guarantees that any `StationId` value is well-formed by construction.
///
/// # Examples
///
/// ```
/// use board_server::domain::StationId;
///
/// let taipei = StationId::parse("1000").unwrap();
/// assert_eq!(taipei.as_str(), "1000");
///
/// // Non-digit codes are rejected
/// assert!(StationId::parse("TPE").is_err());
///
/// // Empty codes are rejected
/// assert!(StationId::parse("").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationId(String);

/// Longest station ID the upstream feed uses.
const MAX_LEN: usize = 6;

impl StationId {
    /// Parse a station ID from a string.
    ///
    /// The input must be 1 to 6 ASCII digits.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if s.len() > MAX_LEN {
            return Err(InvalidStationId {
                reason: "too long (max 6 characters)",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidStationId {
                reason: "must be ASCII digits 0-9",
            });
        }

        Ok(StationId(s.to_string()))
    }

    /// Returns the station ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_ids() {
        assert!(StationId::parse("1000").is_ok());
        assert!(StationId::parse("0900").is_ok());
        assert!(StationId::parse("1").is_ok());
        assert!(StationId::parse("123456").is_ok());
    }

    #[test]
    fn reject_non_digits() {
        assert!(StationId::parse("TPE").is_err());
        assert!(StationId::parse("10a0").is_err());
        assert!(StationId::parse("10-0").is_err());
        assert!(StationId::parse("１０００").is_err()); // full-width digits
    }

    #[test]
    fn reject_empty_and_too_long() {
        assert!(StationId::parse("").is_err());
        assert!(StationId::parse("1234567").is_err());
    }

    #[test]
    fn leading_zero_preserved() {
        let keelung = StationId::parse("0900").unwrap();
        assert_eq!(keelung.as_str(), "0900");
        assert_ne!(keelung, StationId::parse("900").unwrap());
    }

    #[test]
    fn display_and_debug() {
        let id = StationId::parse("1000").unwrap();
        assert_eq!(format!("{}", id), "1000");
        assert_eq!(format!("{:?}", id), "StationId(1000)");
    }

    #[test]
    fn hash_consistent_with_eq() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(StationId::parse("1000").unwrap());
        assert!(set.contains(&StationId::parse("1000").unwrap()));
        assert!(!set.contains(&StationId::parse("1100").unwrap()));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn roundtrip(s in "[0-9]{1,6}") {
            let id = StationId::parse(&s).unwrap();
            prop_assert_eq!(id.as_str(), s.as_str());
        }

        /// Any string with a non-digit is rejected
        #[test]
        fn non_digit_rejected(s in "[0-9]{0,3}[a-zA-Z][0-9]{0,3}") {
            prop_assert!(StationId::parse(&s).is_err());
        }

        /// Over-long digit strings are rejected
        #[test]
        fn too_long_rejected(s in "[0-9]{7,12}") {
            prop_assert!(StationId::parse(&s).is_err());
        }
    }
}
