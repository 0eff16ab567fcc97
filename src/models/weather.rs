//! Weather snapshot model and display methods

use serde::{Deserialize, Serialize};

/// Current conditions at a recipient's location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Short condition label from the provider, e.g. `Clouds`
    pub condition: String,
    /// Temperature in Celsius
    pub temperature_celsius: f64,
}

impl WeatherSnapshot {
    #[must_use]
    pub fn new(condition: impl Into<String>, temperature_celsius: f64) -> Self {
        Self {
            condition: condition.into(),
            temperature_celsius,
        }
    }

    /// Temperature as the shortest decimal text (`12.5`, `12`, `-3.2`)
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}", self.temperature_celsius)
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature_with_unit(&self) -> String {
        format!("{}°C", self.format_temperature())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_temperature() {
        assert_eq!(WeatherSnapshot::new("Clear", 12.5).format_temperature(), "12.5");
        assert_eq!(WeatherSnapshot::new("Clear", 12.0).format_temperature(), "12");
        assert_eq!(WeatherSnapshot::new("Snow", -3.2).format_temperature(), "-3.2");
    }

    #[test]
    fn test_format_temperature_with_unit() {
        assert_eq!(
            WeatherSnapshot::new("Rain", 7.25).format_temperature_with_unit(),
            "7.25°C"
        );
    }
}
