use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::catalog::{load_metadata, MetadataSource, VariableCatalog};
use crate::client::MeasureSpaceApi;
use crate::config::ApiKeys;
use crate::models::{
    AirQualityRequest, CityRequest, CoordinatesRequest, ForecastReport, ForecastRequest,
    GeocodedLocation, Unit,
};
use crate::tools::{ApiKeySlot, ForecastKind};

/// MCP server exposing the MeasureSpace forecast and geocoding tools
#[derive(Clone)]
pub struct MeasureSpace {
    api: Arc<dyn MeasureSpaceApi>,
    metadata: Arc<dyn MetadataSource>,
    keys: Arc<ApiKeys>,
    tool_router: ToolRouter<Self>,
}

impl MeasureSpace {
    /// Creates a server backed by the built-in variable catalog
    pub fn new(api: Arc<dyn MeasureSpaceApi>, keys: ApiKeys) -> Self {
        Self::with_metadata_source(api, Arc::new(VariableCatalog), keys)
    }

    pub fn with_metadata_source(
        api: Arc<dyn MeasureSpaceApi>,
        metadata: Arc<dyn MetadataSource>,
        keys: ApiKeys,
    ) -> Self {
        Self {
            api,
            metadata,
            keys: Arc::new(keys),
            tool_router: Self::tool_router(),
        }
    }

    /// Shared body of every forecast tool, driven by the descriptor table
    async fn forecast(
        &self,
        kind: ForecastKind,
        latitude: f64,
        longitude: f64,
        unit: Unit,
    ) -> Result<CallToolResult, McpError> {
        let tool = kind.descriptor();
        tracing::info!(
            "{} for coordinates: {}, {}",
            tool.name,
            latitude,
            longitude
        );

        let params = tool.query_params(unit);
        let result = self
            .api
            .fetch_forecast(kind, self.keys.get(tool.key), latitude, longitude, &params)
            .await
            .map_err(|e| {
                McpError::internal_error(format!("Failed to fetch {}: {}", tool.name, e), None)
            })?;

        let metadata = load_metadata(
            self.metadata.as_ref(),
            tool.variables,
            tool.metadata_unit(unit),
        );

        json_result(&ForecastReport { result, metadata })
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| {
        McpError::internal_error(format!("Failed to serialize result: {}", e), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[tool_handler]
impl ServerHandler for MeasureSpace {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "MeasureSpaceMCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "This is a Weather, Climate, Air Quality and Geocoding server. \
                You can get weather, climate and air quality forecast and \
                geocoding information by calling the available tools."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl MeasureSpace {
    #[tool(description = "Get daily weather forecast for next 15 days.")]
    async fn daily_weather_forecast(
        &self,
        Parameters(request): Parameters<ForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.forecast(
            ForecastKind::DailyWeather,
            request.latitude,
            request.longitude,
            request.unit,
        )
        .await
    }

    #[tool(description = "Get hourly weather forecast for next 5 days.")]
    async fn hourly_weather_forecast(
        &self,
        Parameters(request): Parameters<ForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.forecast(
            ForecastKind::HourlyWeather,
            request.latitude,
            request.longitude,
            request.unit,
        )
        .await
    }

    #[tool(description = "Get daily climate forecast for next 9 months.")]
    async fn daily_climate_forecast(
        &self,
        Parameters(request): Parameters<ForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.forecast(
            ForecastKind::DailyClimate,
            request.latitude,
            request.longitude,
            request.unit,
        )
        .await
    }

    #[tool(description = "Get hourly air quality forecast for next 4 days.")]
    async fn hourly_air_quality_forecast(
        &self,
        Parameters(request): Parameters<AirQualityRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.forecast(
            ForecastKind::HourlyAirQuality,
            request.latitude,
            request.longitude,
            Unit::Metric,
        )
        .await
    }

    #[tool(description = "Get daily air quality forecast for next 4 days.")]
    async fn daily_air_quality_forecast(
        &self,
        Parameters(request): Parameters<AirQualityRequest>,
    ) -> Result<CallToolResult, McpError> {
        self.forecast(
            ForecastKind::DailyAirQuality,
            request.latitude,
            request.longitude,
            Unit::Metric,
        )
        .await
    }

    #[tool(description = "Find the latitude and longitude for a given city name.")]
    async fn convert_city_to_latitude_longitude(
        &self,
        Parameters(request): Parameters<CityRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Geocoding city: {}", request.location_name);

        let coordinates = self
            .api
            .city_to_coordinates(self.keys.get(ApiKeySlot::Geocoding), &request.location_name)
            .await
            .map_err(|e| McpError::internal_error(format!("Failed to geocode city: {}", e), None))?;

        json_result(&GeocodedLocation::from(coordinates))
    }

    #[tool(description = "Find the nearest city for given latitude and longitude.")]
    async fn find_nearest_city_from_latitude_longitude(
        &self,
        Parameters(request): Parameters<CoordinatesRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            "Finding nearest city for coordinates: {}, {}",
            request.latitude,
            request.longitude
        );

        let city = self
            .api
            .nearest_city(
                self.keys.get(ApiKeySlot::Geocoding),
                request.latitude,
                request.longitude,
            )
            .await
            .map_err(|e| {
                McpError::internal_error(format!("Failed to find nearest city: {}", e), None)
            })?;

        json_result(&city.unwrap_or_else(|| Value::from("Not Found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, MetadataError};
    use crate::models::{Coordinates, VariableMetadata};
    use crate::tools::FORECAST_TOOLS;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct RecordedCall {
        kind: ForecastKind,
        api_key: String,
        latitude: f64,
        longitude: f64,
        params: Vec<(&'static str, String)>,
    }

    /// Upstream stub answering from fixtures and recording forecast calls
    #[derive(Default)]
    struct StubApi {
        fail: bool,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl StubApi {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn upstream_error() -> ApiError {
            ApiError::Status {
                status: reqwest::StatusCode::FORBIDDEN,
                body: "Forbidden".to_string(),
            }
        }
    }

    #[async_trait]
    impl MeasureSpaceApi for StubApi {
        async fn fetch_forecast(
            &self,
            kind: ForecastKind,
            api_key: &str,
            latitude: f64,
            longitude: f64,
            params: &[(&'static str, String)],
        ) -> Result<Value, ApiError> {
            self.calls.lock().unwrap().push(RecordedCall {
                kind,
                api_key: api_key.to_string(),
                latitude,
                longitude,
                params: params.to_vec(),
            });
            if self.fail {
                return Err(Self::upstream_error());
            }
            Ok(json!({ "tp": [0.0, 1.2], "minT": [3.0, 4.5] }))
        }

        async fn city_to_coordinates(
            &self,
            _api_key: &str,
            location_name: &str,
        ) -> Result<Option<Coordinates>, ApiError> {
            if self.fail {
                return Err(Self::upstream_error());
            }
            Ok(match location_name {
                "Paris" => Some(Coordinates {
                    latitude: Some(48.8566),
                    longitude: Some(2.3522),
                }),
                "Bir Tawil" => Some(Coordinates {
                    latitude: None,
                    longitude: None,
                }),
                _ => None,
            })
        }

        async fn nearest_city(
            &self,
            _api_key: &str,
            latitude: f64,
            _longitude: f64,
        ) -> Result<Option<Value>, ApiError> {
            if self.fail {
                return Err(Self::upstream_error());
            }
            Ok((latitude > 0.0).then(|| json!({ "name": "London", "country": "GB" })))
        }
    }

    /// Metadata stub that fails for selected codes
    struct StubMetadata {
        failing: HashSet<&'static str>,
    }

    impl MetadataSource for StubMetadata {
        fn lookup(&self, code: &str, unit: Unit) -> Result<VariableMetadata, MetadataError> {
            if self.failing.contains(code) {
                return Err(MetadataError::UnknownVariable(code.to_string()));
            }
            Ok(VariableMetadata {
                description: Some(code.to_string()),
                unit: Some(unit.to_string()),
            })
        }
    }

    fn keys() -> ApiKeys {
        ApiKeys {
            geocoding: "geo-key".to_string(),
            hourly_weather: "hourly-key".to_string(),
            daily_weather: "daily-key".to_string(),
            daily_climate: "climate-key".to_string(),
            air_quality: "air-key".to_string(),
        }
    }

    fn server(api: Arc<StubApi>, failing: &[&'static str]) -> MeasureSpace {
        let metadata = StubMetadata {
            failing: failing.iter().copied().collect(),
        };
        MeasureSpace::with_metadata_source(api, Arc::new(metadata), keys())
    }

    fn text_of(result: &CallToolResult) -> Value {
        let raw = serde_json::to_value(result).unwrap();
        serde_json::from_str(raw["content"][0]["text"].as_str().unwrap()).unwrap()
    }

    fn forecast_request(unit: Unit) -> Parameters<ForecastRequest> {
        Parameters(ForecastRequest {
            latitude: 51.5,
            longitude: -0.12,
            unit,
        })
    }

    fn air_quality_request() -> Parameters<AirQualityRequest> {
        Parameters(AirQualityRequest {
            latitude: 40.7,
            longitude: -74.0,
        })
    }

    /// Metadata keys in serialized order
    fn metadata_keys(report: &Value) -> Vec<String> {
        report["metadata"]
            .as_object()
            .unwrap()
            .keys()
            .cloned()
            .collect()
    }

    /// The tool's variable list minus the codes whose lookup fails
    fn expected_keys(kind: ForecastKind, failing: &[&str]) -> Vec<String> {
        kind.descriptor()
            .variables
            .split(',')
            .filter(|code| !failing.contains(code))
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_daily_weather_omits_failed_metadata() {
        let api = Arc::new(StubApi::default());
        let server = server(api.clone(), &["maxT"]);

        let result = server
            .daily_weather_forecast(forecast_request(Unit::Metric))
            .await
            .unwrap();
        let report = text_of(&result);

        assert_eq!(
            metadata_keys(&report),
            expected_keys(ForecastKind::DailyWeather, &["maxT"])
        );
        assert_eq!(report["metadata"]["tp"]["unit"], "metric");
        assert_eq!(report["result"]["tp"], json!([0.0, 1.2]));

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind, ForecastKind::DailyWeather);
        assert_eq!(calls[0].api_key, "daily-key");
        assert_eq!(calls[0].latitude, 51.5);
        assert_eq!(calls[0].longitude, -0.12);
        assert_eq!(
            calls[0].params,
            vec![
                (
                    "variables",
                    ForecastKind::DailyWeather.descriptor().variables.to_string()
                ),
                ("unit", "metric".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_metadata_keys_follow_variable_order() {
        let api = Arc::new(StubApi::default());
        let server = server(api, &["t2m", "sp"]);

        let result = server
            .hourly_weather_forecast(forecast_request(Unit::Imperial))
            .await
            .unwrap();
        let report = text_of(&result);

        assert_eq!(
            metadata_keys(&report),
            expected_keys(ForecastKind::HourlyWeather, &["t2m", "sp"])
        );
        assert_eq!(report["metadata"]["tp"]["unit"], "imperial");
    }

    #[tokio::test]
    async fn test_climate_uses_climate_key_and_unit() {
        let api = Arc::new(StubApi::default());
        let server = server(api.clone(), &["soilw"]);

        let result = server
            .daily_climate_forecast(forecast_request(Unit::Imperial))
            .await
            .unwrap();
        let report = text_of(&result);

        assert_eq!(
            metadata_keys(&report),
            expected_keys(ForecastKind::DailyClimate, &["soilw"])
        );
        assert_eq!(report["metadata"]["t2m"]["unit"], "imperial");

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls[0].kind, ForecastKind::DailyClimate);
        assert_eq!(calls[0].api_key, "climate-key");
        assert!(calls[0].params.contains(&("unit", "imperial".to_string())));
    }

    #[tokio::test]
    async fn test_air_quality_sends_no_unit_and_enriches_metric() {
        let api = Arc::new(StubApi::default());
        let server = server(api.clone(), &["DP"]);

        let hourly = text_of(
            &server
                .hourly_air_quality_forecast(air_quality_request())
                .await
                .unwrap(),
        );
        let daily = text_of(
            &server
                .daily_air_quality_forecast(air_quality_request())
                .await
                .unwrap(),
        );

        assert_eq!(
            metadata_keys(&hourly),
            expected_keys(ForecastKind::HourlyAirQuality, &["DP"])
        );
        assert_eq!(hourly["metadata"]["AQI"]["unit"], "metric");
        assert_eq!(
            metadata_keys(&daily),
            expected_keys(ForecastKind::DailyAirQuality, &[])
        );

        let calls = api.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        for call in calls.iter() {
            assert_eq!(call.api_key, "air-key");
            assert_eq!(call.params.len(), 1);
            assert_eq!(call.params[0].0, "variables");
        }
        assert_eq!(calls[0].kind, ForecastKind::HourlyAirQuality);
        assert_eq!(calls[1].kind, ForecastKind::DailyAirQuality);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_a_tool_error() {
        let server = server(Arc::new(StubApi::failing()), &[]);

        let err = server
            .daily_weather_forecast(forecast_request(Unit::Metric))
            .await
            .unwrap_err();

        assert!(err.message.contains("daily_weather_forecast"));
        assert!(err.message.contains("403"));
    }

    #[tokio::test]
    async fn test_city_to_coordinates() {
        let server = server(Arc::new(StubApi::default()), &[]);

        let paris = server
            .convert_city_to_latitude_longitude(Parameters(CityRequest {
                location_name: "Paris".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(
            text_of(&paris),
            json!({ "latitude": 48.8566, "longitude": 2.3522 })
        );

        let nowhere = server
            .convert_city_to_latitude_longitude(Parameters(CityRequest {
                location_name: "Atlantis".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(
            text_of(&nowhere),
            json!({ "latitude": null, "longitude": null })
        );

        let unplaced = server
            .convert_city_to_latitude_longitude(Parameters(CityRequest {
                location_name: "Bir Tawil".to_string(),
            }))
            .await
            .unwrap();
        assert_eq!(
            text_of(&unplaced),
            json!({ "latitude": null, "longitude": null })
        );
    }

    #[tokio::test]
    async fn test_nearest_city() {
        let server = server(Arc::new(StubApi::default()), &[]);

        let found = server
            .find_nearest_city_from_latitude_longitude(Parameters(CoordinatesRequest {
                latitude: 51.5,
                longitude: -0.12,
            }))
            .await
            .unwrap();
        assert_eq!(text_of(&found)["name"], "London");

        let missing = server
            .find_nearest_city_from_latitude_longitude(Parameters(CoordinatesRequest {
                latitude: -89.0,
                longitude: 0.0,
            }))
            .await
            .unwrap();
        assert_eq!(text_of(&missing), json!("Not Found"));
    }

    #[tokio::test]
    async fn test_geocoding_failure_propagates() {
        let server = server(Arc::new(StubApi::failing()), &[]);

        let result = server
            .convert_city_to_latitude_longitude(Parameters(CityRequest {
                location_name: "Paris".to_string(),
            }))
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_registered_tools_match_descriptor_table() {
        let server = server(Arc::new(StubApi::default()), &[]);
        let tools: Vec<Value> = server
            .tool_router
            .list_all()
            .iter()
            .map(|tool| serde_json::to_value(tool).unwrap())
            .collect();

        assert_eq!(tools.len(), 7);
        for descriptor in &FORECAST_TOOLS {
            let tool = tools
                .iter()
                .find(|tool| tool["name"] == descriptor.name)
                .unwrap();
            assert!(tool["description"].as_str().is_some_and(|d| !d.is_empty()));
        }
        assert!(tools
            .iter()
            .any(|tool| tool["name"] == "convert_city_to_latitude_longitude"));
        assert!(tools
            .iter()
            .any(|tool| tool["name"] == "find_nearest_city_from_latitude_longitude"));
    }

    #[test]
    fn test_get_info() {
        let info = server(Arc::new(StubApi::default()), &[]).get_info();

        assert_eq!(info.server_info.name, "MeasureSpaceMCP");
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("Air Quality"));
    }
}
