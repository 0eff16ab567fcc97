//! Current weather lookups
//!
//! [`fetch`] turns a resolved location into a provider query and asks a
//! [`WeatherProvider`] for the current conditions. Temperatures are always
//! requested in Celsius.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{debug, instrument};

use crate::config::WeatherConfig;
use crate::http_client::{build_client, redact_url};
use crate::models::{ResolvedLocation, WeatherSnapshot};
use crate::{NotifyError, Result};

/// Source of current weather conditions
#[async_trait]
pub trait WeatherProvider: Send + Sync + 'static {
    /// Current conditions for a `city[,countryCode]` query
    async fn current(&self, query: &str) -> Result<WeatherSnapshot>;
}

#[async_trait]
impl<T: WeatherProvider + ?Sized> WeatherProvider for Arc<T> {
    async fn current(&self, query: &str) -> Result<WeatherSnapshot> {
        (**self).current(query).await
    }
}

/// Units requested from the provider; snapshots carry Celsius
const UNITS: &str = "metric";

/// Fetch current weather for a city, optionally narrowed by country code.
///
/// An empty city is a caller bug and fails with `InvalidLocationQuery`
/// without touching the network.
pub async fn fetch<W: WeatherProvider + ?Sized>(
    provider: &W,
    location: &ResolvedLocation,
) -> Result<WeatherSnapshot> {
    if location.city.trim().is_empty() {
        return Err(NotifyError::invalid_location_query("city is not defined"));
    }
    provider.current(&location.weather_query()).await
}

/// Client for the OpenWeatherMap current-weather endpoint
pub struct OpenWeatherClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> anyhow::Result<Self> {
        let user_agent = format!("weathermail/{}", crate::VERSION);
        let client = build_client(&user_agent, config.timeout())?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn request_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}?q={}&units={}",
            self.base_url,
            urlencoding::encode(query),
            UNITS
        );
        if let Some(api_key) = &self.api_key {
            url.push_str("&appid=");
            url.push_str(&urlencoding::encode(api_key));
        }
        url
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn current(&self, query: &str) -> Result<WeatherSnapshot> {
        let response = self
            .client
            .get(self.request_url(query))
            .send()
            .await
            .map_err(|e| NotifyError::weather_provider(query, redact_url(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::weather_provider(
                query,
                anyhow::anyhow!("weather provider returned HTTP {status}"),
            ));
        }

        let body: openweather::CurrentResponse = response
            .json()
            .await
            .map_err(|e| NotifyError::weather_provider(query, e.without_url()))?;

        let snapshot = body
            .into_snapshot()
            .map_err(|e| NotifyError::weather_provider(query, e))?;

        debug!(
            "Weather for {}: {} {}",
            query,
            snapshot.condition,
            snapshot.format_temperature_with_unit()
        );

        Ok(snapshot)
    }
}

/// `OpenWeatherMap` API response structures and conversion utilities
mod openweather {
    use super::WeatherSnapshot;
    use anyhow::{Result, anyhow};
    use serde::Deserialize;

    /// Current weather response; only the fields we render are modelled
    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        #[serde(default)]
        pub weather: Vec<Condition>,
        pub main: MainData,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub main: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        pub temp: f64,
    }

    impl CurrentResponse {
        /// Keep the first condition descriptor and the temperature
        pub fn into_snapshot(self) -> Result<WeatherSnapshot> {
            let condition = self
                .weather
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("response contains no weather conditions"))?;
            Ok(WeatherSnapshot::new(condition.main, self.main.temp))
        }
    }
}
