use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

// ============================================================================
// Units
// ============================================================================

/// Unit system requested from the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Metric,
    Imperial,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Metric => "metric",
            Unit::Imperial => "imperial",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Variable Metadata
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMetadata {
    pub description: Option<String>,
    pub unit: Option<String>,
}

impl From<VariableMetadata> for Value {
    fn from(metadata: VariableMetadata) -> Self {
        json!({
            "description": metadata.description,
            "unit": metadata.unit,
        })
    }
}

/// Metadata keyed by variable code. Relies on serde_json's `preserve_order`
/// so keys iterate and serialize in insertion order.
pub type MetadataMap = Map<String, Value>;

// ============================================================================
// Tool Results
// ============================================================================

/// Raw upstream forecast paired with metadata for its variables
#[derive(Debug, Serialize)]
pub struct ForecastReport {
    pub result: Value,
    pub metadata: MetadataMap,
}

/// First geocoding match; either field may be absent upstream
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "lat", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "lon", default)]
    pub longitude: Option<f64>,
}

/// Geocoding answer; both fields are null when the city is unknown
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeocodedLocation {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<Option<Coordinates>> for GeocodedLocation {
    fn from(coordinates: Option<Coordinates>) -> Self {
        Self {
            latitude: coordinates.and_then(|c| c.latitude),
            longitude: coordinates.and_then(|c| c.longitude),
        }
    }
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct ForecastRequest {
    #[schemars(description = "Latitude of the location")]
    pub latitude: f64,
    #[schemars(description = "Longitude of the location")]
    pub longitude: f64,
    #[schemars(description = "Unit system: 'metric' or 'imperial'")]
    pub unit: Unit,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct AirQualityRequest {
    #[schemars(description = "Latitude of the location")]
    pub latitude: f64,
    #[schemars(description = "Longitude of the location")]
    pub longitude: f64,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct CityRequest {
    #[schemars(description = "City or location name to geocode")]
    pub location_name: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct CoordinatesRequest {
    #[schemars(description = "Latitude of the location")]
    pub latitude: f64,
    #[schemars(description = "Longitude of the location")]
    pub longitude: f64,
}
