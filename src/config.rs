use std::time::Duration;

use crate::constants::{
    AIR_QUALITY_API_KEY_VAR, DAILY_CLIMATE_API_KEY_VAR, DAILY_WEATHER_API_KEY_VAR,
    DEFAULT_TIMEOUT_SECS, GEOCODING_API_KEY_VAR, HOURLY_WEATHER_API_KEY_VAR, TIMEOUT_SECS_VAR,
};
use crate::error::ConfigError;
use crate::tools::ApiKeySlot;

/// Per-capability API keys
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub geocoding: String,
    pub hourly_weather: String,
    pub daily_weather: String,
    pub daily_climate: String,
    pub air_quality: String,
}

impl ApiKeys {
    pub fn get(&self, slot: ApiKeySlot) -> &str {
        match slot {
            ApiKeySlot::Geocoding => &self.geocoding,
            ApiKeySlot::HourlyWeather => &self.hourly_weather,
            ApiKeySlot::DailyWeather => &self.daily_weather,
            ApiKeySlot::DailyClimate => &self.daily_climate,
            ApiKeySlot::AirQuality => &self.air_quality,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub keys: ApiKeys,
    pub timeout: Duration,
}

impl Config {
    /// Reads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = |name: &'static str| {
            lookup(name).unwrap_or_else(|| {
                tracing::warn!("{} is not set; calls that need it will be rejected upstream", name);
                String::new()
            })
        };

        let keys = ApiKeys {
            geocoding: key(GEOCODING_API_KEY_VAR),
            hourly_weather: key(HOURLY_WEATHER_API_KEY_VAR),
            daily_weather: key(DAILY_WEATHER_API_KEY_VAR),
            daily_climate: key(DAILY_CLIMATE_API_KEY_VAR),
            air_quality: key(AIR_QUALITY_API_KEY_VAR),
        };

        let timeout_secs = match lookup(TIMEOUT_SECS_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidValue {
                    name: TIMEOUT_SECS_VAR,
                    value: raw,
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            keys,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
