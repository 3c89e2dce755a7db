//! Station identity types.

use std::fmt;

use super::Location;

/// Korean suffix meaning "station" (e.g. 강남역).
const STATION_SUFFIX: char = '역';

/// Normalized station name used for deduplication and factor lookup.
///
/// Provider place names carry qualifiers after the station itself: exit
/// numbers, line names, parenthesised notes. The key keeps only the leading
/// token, lowercased, without a trailing "역".
///
/// # Examples
///
/// ```
/// use meetpoint_server::domain::StationKey;
///
/// let a = StationKey::from_name("Gangnam Station Exit 1").unwrap();
/// let b = StationKey::from_name("gangnam station exit 2").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "gangnam");
///
/// let c = StationKey::from_name("강남역 2호선").unwrap();
/// assert_eq!(c.as_str(), "강남");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StationKey(String);

impl StationKey {
    /// Build the key for a place name. Returns `None` for blank names.
    pub fn from_name(name: &str) -> Option<Self> {
        leading_name(name).map(|token| StationKey(token.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationKey({})", self.0)
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The leading token of a place name with any trailing "역" removed,
/// in its original case.
pub fn leading_name(name: &str) -> Option<&str> {
    let token = name
        .split(|c: char| c.is_whitespace() || c == '(')
        .find(|t| !t.is_empty())?;

    Some(
        token
            .strip_suffix(STATION_SUFFIX)
            .filter(|s| !s.is_empty())
            .unwrap_or(token),
    )
}

/// A transit station eligible for scoring in one request.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateStation {
    /// Provider place id.
    pub id: String,

    /// Display name (the leading name token).
    pub name: String,

    /// Deduplication and factor-lookup key.
    pub key: StationKey,

    pub location: Location,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_numbers_collapse() {
        let a = StationKey::from_name("Gangnam Station Exit 1").unwrap();
        let b = StationKey::from_name("Gangnam Station Exit 2").unwrap();
        assert_eq!(a, b);
        assert_eq!(leading_name("Gangnam Station Exit 2"), Some("Gangnam"));
    }

    #[test]
    fn case_and_space_insensitive() {
        let a = StationKey::from_name("  GANGNAM   Station").unwrap();
        let b = StationKey::from_name("gangnam").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn strips_korean_station_suffix() {
        assert_eq!(leading_name("강남역 2호선"), Some("강남"));
        assert_eq!(leading_name("서울역(1호선)"), Some("서울"));
        assert_eq!(leading_name("역삼역 3번출구"), Some("역삼"));
    }

    #[test]
    fn bare_suffix_is_kept() {
        assert_eq!(leading_name("역"), Some("역"));
    }

    #[test]
    fn blank_names_have_no_key() {
        assert!(StationKey::from_name("").is_none());
        assert!(StationKey::from_name("   ").is_none());
    }
}
