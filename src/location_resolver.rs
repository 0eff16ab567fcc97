//! Location Resolution Module
//!
//! Turns the free-text location on a recipient's profile (`"Berlin, Germany"`,
//! `"Paris France"`, `"Germany"`) into a [`ResolvedLocation`].
//!
//! Only the first two significant tokens are considered. This is a lossy
//! heuristic, not address parsing: `"San Francisco, USA"` resolves to the
//! city `San` with no country.

use crate::countries;
use crate::models::ResolvedLocation;
use tracing::debug;

/// Service for resolving profile location strings
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a raw location into a city and country code.
    ///
    /// Returns `None` when there is no usable location text. The first of
    /// the two tokens that names a country becomes the country code and the
    /// other token becomes the city. A lone country name yields a
    /// country-only location with an empty city.
    #[must_use]
    pub fn resolve(raw_location: Option<&str>) -> Option<ResolvedLocation> {
        let raw = raw_location?;
        let (first, second) = Self::significant_tokens(raw)?;

        let location = if let Some(code) = countries::alpha2_code(first) {
            ResolvedLocation::with_country(second.unwrap_or_default(), code)
        } else if let Some(code) = second.and_then(countries::alpha2_code) {
            ResolvedLocation::with_country(first, code)
        } else {
            ResolvedLocation::city(first)
        };

        debug!(
            "Resolved location '{}' to city '{}' country {:?}",
            raw, location.city, location.country_code
        );

        Some(location)
    }

    /// First and second non-empty tokens, splitting on whitespace and commas
    fn significant_tokens(raw: &str) -> Option<(&str, Option<&str>)> {
        let mut tokens = raw
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|token| !token.is_empty());
        let first = tokens.next()?;
        Some((first, tokens.next()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Berlin, Germany", "Berlin", Some("DE"))]
    #[case("Berlin,Germany", "Berlin", Some("DE"))]
    #[case("Paris France", "Paris", Some("FR"))]
    #[case("Germany, Berlin", "Berlin", Some("DE"))]
    #[case("Germany", "", Some("DE"))]
    #[case("germany", "", Some("DE"))]
    #[case("Atlantis", "Atlantis", None)]
    #[case("Springfield, Nowhere", "Springfield", None)]
    #[case("  Oslo ,  Norway  ", "Oslo", Some("NO"))]
    #[case("Lyon, France, Europe", "Lyon", Some("FR"))]
    #[case("San Francisco, USA", "San", None)]
    #[case("Germany France", "France", Some("DE"))]
    fn test_resolve(
        #[case] raw: &str,
        #[case] city: &str,
        #[case] country: Option<&str>,
    ) {
        let location = LocationResolver::resolve(Some(raw)).unwrap();
        assert_eq!(location.city, city);
        assert_eq!(location.country_code.as_deref(), country);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    #[case(Some(" , ,"))]
    fn test_no_location(#[case] raw: Option<&str>) {
        assert_eq!(LocationResolver::resolve(raw), None);
    }

    #[test]
    fn test_resolved_location_is_never_blank() {
        for raw in ["Germany", "Atlantis", "Berlin, Germany", ",Rome,"] {
            let location = LocationResolver::resolve(Some(raw)).unwrap();
            assert!(location.has_city() || location.country_code.is_some());
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let first = LocationResolver::resolve(Some("Berlin, Germany"));
        let second = LocationResolver::resolve(Some("Berlin, Germany"));
        assert_eq!(first, second);
    }
}
