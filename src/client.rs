//! HTTP client for the MeasureSpace forecast and geocoding endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::constants::{
    API_KEY_HEADER, DAILY_AIR_QUALITY_URL, DAILY_CLIMATE_URL, DAILY_WEATHER_URL,
    GEOCODING_AUTOCOMPLETE_URL, GEOCODING_NEAREST_CITY_URL, HOURLY_AIR_QUALITY_URL,
    HOURLY_WEATHER_URL, USER_AGENT,
};
use crate::error::ApiError;
use crate::models::Coordinates;
use crate::tools::ForecastKind;

/// Upstream operations the tools are built on
#[async_trait]
pub trait MeasureSpaceApi: Send + Sync {
    /// Fetches a forecast; the response body is returned untouched
    async fn fetch_forecast(
        &self,
        kind: ForecastKind,
        api_key: &str,
        latitude: f64,
        longitude: f64,
        params: &[(&'static str, String)],
    ) -> Result<Value, ApiError>;

    /// Resolves a city name to coordinates, `None` if nothing matched
    async fn city_to_coordinates(
        &self,
        api_key: &str,
        location_name: &str,
    ) -> Result<Option<Coordinates>, ApiError>;

    /// Finds the city closest to the given coordinates
    async fn nearest_city(
        &self,
        api_key: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Value>, ApiError>;
}

/// Endpoint URLs, overridable for testing
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub hourly_weather: String,
    pub daily_weather: String,
    pub daily_climate: String,
    pub hourly_air_quality: String,
    pub daily_air_quality: String,
    pub geocoding_nearest_city: String,
    pub geocoding_autocomplete: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            hourly_weather: HOURLY_WEATHER_URL.to_string(),
            daily_weather: DAILY_WEATHER_URL.to_string(),
            daily_climate: DAILY_CLIMATE_URL.to_string(),
            hourly_air_quality: HOURLY_AIR_QUALITY_URL.to_string(),
            daily_air_quality: DAILY_AIR_QUALITY_URL.to_string(),
            geocoding_nearest_city: GEOCODING_NEAREST_CITY_URL.to_string(),
            geocoding_autocomplete: GEOCODING_AUTOCOMPLETE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Points every endpoint at `base`, keeping the upstream path names
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            hourly_weather: format!("{base}/global-hourly-weather-forecast"),
            daily_weather: format!("{base}/global-daily-weather-forecast"),
            daily_climate: format!("{base}/global-daily-climate-forecast"),
            hourly_air_quality: format!("{base}/global-hourly-air-quality-forecast"),
            daily_air_quality: format!("{base}/global-daily-air-quality-forecast"),
            geocoding_nearest_city: format!("{base}/nearest-city"),
            geocoding_autocomplete: format!("{base}/autocomplete"),
        }
    }

    fn forecast(&self, kind: ForecastKind) -> &str {
        match kind {
            ForecastKind::HourlyWeather => &self.hourly_weather,
            ForecastKind::DailyWeather => &self.daily_weather,
            ForecastKind::DailyClimate => &self.daily_climate,
            ForecastKind::HourlyAirQuality => &self.hourly_air_quality,
            ForecastKind::DailyAirQuality => &self.daily_air_quality,
        }
    }
}

/// `results` may be missing or null when nothing matched
#[derive(Debug, Deserialize)]
struct GeocodingResponse<T> {
    results: Option<Vec<T>>,
}

impl<T> GeocodingResponse<T> {
    fn first(self) -> Option<T> {
        self.results.and_then(|results| results.into_iter().next())
    }
}

/// reqwest-backed implementation of [`MeasureSpaceApi`]
#[derive(Debug, Clone)]
pub struct MeasureSpaceClient {
    client: Client,
    endpoints: Endpoints,
}

impl MeasureSpaceClient {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, endpoints })
    }

    /// Makes an authenticated GET request and deserializes the JSON response
    async fn make_request<T: DeserializeOwned>(
        &self,
        url: &str,
        api_key: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Request to {} failed with status {}", url, status);
            return Err(ApiError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MeasureSpaceApi for MeasureSpaceClient {
    async fn fetch_forecast(
        &self,
        kind: ForecastKind,
        api_key: &str,
        latitude: f64,
        longitude: f64,
        params: &[(&'static str, String)],
    ) -> Result<Value, ApiError> {
        let mut query = vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
        ];
        query.extend(params.iter().cloned());

        self.make_request(self.endpoints.forecast(kind), api_key, &query)
            .await
    }

    async fn city_to_coordinates(
        &self,
        api_key: &str,
        location_name: &str,
    ) -> Result<Option<Coordinates>, ApiError> {
        let query = [
            ("query", location_name.to_string()),
            ("limit", "1".to_string()),
        ];

        let response: GeocodingResponse<Coordinates> = self
            .make_request(&self.endpoints.geocoding_autocomplete, api_key, &query)
            .await?;

        Ok(response.first())
    }

    async fn nearest_city(
        &self,
        api_key: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<Value>, ApiError> {
        let query = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("limit", "1".to_string()),
        ];

        let response: GeocodingResponse<Value> = self
            .make_request(&self.endpoints.geocoding_nearest_city, api_key, &query)
            .await?;

        Ok(response.first())
    }
}
