//! Location model for a recipient's inferred whereabouts

use serde::{Deserialize, Serialize};

/// City and country parsed from a free-text profile location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    /// City name, possibly empty when only the country is known
    pub city: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country_code: Option<String>,
}

impl ResolvedLocation {
    /// Create a location with a city and no known country
    #[must_use]
    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country_code: None,
        }
    }

    /// Create location with country
    #[must_use]
    pub fn with_country(city: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            country_code: Some(country_code.into()),
        }
    }

    /// Whether a weather lookup can be attempted for this location
    #[must_use]
    pub fn has_city(&self) -> bool {
        !self.city.is_empty()
    }

    /// Provider query of the form `city[,countryCode]`
    #[must_use]
    pub fn weather_query(&self) -> String {
        match self.country_code.as_deref() {
            Some(code) if !code.is_empty() => format!("{},{}", self.city, code),
            _ => self.city.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_query() {
        assert_eq!(ResolvedLocation::with_country("Paris", "FR").weather_query(), "Paris,FR");
        assert_eq!(ResolvedLocation::city("Atlantis").weather_query(), "Atlantis");
        assert_eq!(ResolvedLocation::with_country("Berlin", "").weather_query(), "Berlin");
    }

    #[test]
    fn test_has_city() {
        assert!(ResolvedLocation::city("Berlin").has_city());
        assert!(!ResolvedLocation::with_country("", "DE").has_city());
    }
}
