/// User agent string for HTTP requests
pub const USER_AGENT: &str = "measure-space-mcp/0.1.0";

/// Header carrying the per-capability API key
pub const API_KEY_HEADER: &str = "X-API-Key";

pub const HOURLY_WEATHER_URL: &str =
    "https://q0np6mu0vi.execute-api.us-east-1.amazonaws.com/prd/global-hourly-weather-forecast";
pub const DAILY_WEATHER_URL: &str =
    "https://4y0sy5lved.execute-api.us-east-1.amazonaws.com/prd/global-daily-weather-forecast";
pub const DAILY_CLIMATE_URL: &str =
    "https://d43arqqeh8.execute-api.us-east-1.amazonaws.com/prd/global-daily-climate-forecast";
pub const HOURLY_AIR_QUALITY_URL: &str =
    "https://pawsqe3sob.execute-api.us-east-1.amazonaws.com/prd/global-hourly-air-quality-forecast";
pub const DAILY_AIR_QUALITY_URL: &str =
    "https://pawsqe3sob.execute-api.us-east-1.amazonaws.com/prd/global-daily-air-quality-forecast";
pub const GEOCODING_NEAREST_CITY_URL: &str =
    "https://ncstsm9hel.execute-api.us-east-1.amazonaws.com/prd/nearest-city";
pub const GEOCODING_AUTOCOMPLETE_URL: &str =
    "https://ncstsm9hel.execute-api.us-east-1.amazonaws.com/prd/autocomplete";

// Environment variables holding the API keys
pub const GEOCODING_API_KEY_VAR: &str = "GEOCODING_API_KEY";
pub const HOURLY_WEATHER_API_KEY_VAR: &str = "HOURLY_WEATHER_API_KEY";
pub const DAILY_WEATHER_API_KEY_VAR: &str = "DAILY_WEATHER_API_KEY";
pub const DAILY_CLIMATE_API_KEY_VAR: &str = "DAILY_CLIMATE_API_KEY";
pub const AIR_QUALITY_API_KEY_VAR: &str = "AIR_QUALITY_API_KEY";

/// Optional override for the upstream request timeout
pub const TIMEOUT_SECS_VAR: &str = "MEASURE_SPACE_TIMEOUT_SECS";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
