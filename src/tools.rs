//! Static table of the forecast tools.

use crate::models::Unit;

/// Which configured API key a tool authenticates with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeySlot {
    Geocoding,
    HourlyWeather,
    DailyWeather,
    DailyClimate,
    AirQuality,
}

/// How a tool treats the unit system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitMode {
    /// Caller picks the unit; it is forwarded upstream and used for metadata
    Caller,
    /// No unit is sent upstream; metadata is always metric
    FixedMetric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastKind {
    DailyWeather,
    HourlyWeather,
    DailyClimate,
    HourlyAirQuality,
    DailyAirQuality,
}

#[derive(Debug)]
pub struct ToolDescriptor {
    pub kind: ForecastKind,
    pub name: &'static str,
    /// Comma-separated variable codes requested from upstream
    pub variables: &'static str,
    pub key: ApiKeySlot,
    pub unit_mode: UnitMode,
}

pub static FORECAST_TOOLS: [ToolDescriptor; 5] = [
    ToolDescriptor {
        kind: ForecastKind::DailyWeather,
        name: "daily_weather_forecast",
        variables: "tp,minT,maxT,timezone,sunrise,sunset,meanWindSpeed,meanWindDegree,minApparentT,maxApparentT",
        key: ApiKeySlot::DailyWeather,
        unit_mode: UnitMode::Caller,
    },
    ToolDescriptor {
        kind: ForecastKind::HourlyWeather,
        name: "hourly_weather_forecast",
        variables: "tp,t2m,timezone,windSpeed,windDegree,r2,d2m,sde,vis,sp,tcc,apparentT",
        key: ApiKeySlot::HourlyWeather,
        unit_mode: UnitMode::Caller,
    },
    ToolDescriptor {
        kind: ForecastKind::DailyClimate,
        name: "daily_climate_forecast",
        variables: "t2m,tmin,tmax,u10,v10,sh2,st,soilw,prate,dswrf",
        key: ApiKeySlot::DailyClimate,
        unit_mode: UnitMode::Caller,
    },
    ToolDescriptor {
        kind: ForecastKind::HourlyAirQuality,
        name: "hourly_air_quality_forecast",
        variables: "CO,NO,NO2,SO2,O3,PM25,PM10,AQI,DP",
        key: ApiKeySlot::AirQuality,
        unit_mode: UnitMode::FixedMetric,
    },
    ToolDescriptor {
        kind: ForecastKind::DailyAirQuality,
        name: "daily_air_quality_forecast",
        variables: "AQI,maxPM25,maxPM10,maxO3,maxSO2,maxNO2,maxNO,maxCO",
        key: ApiKeySlot::AirQuality,
        unit_mode: UnitMode::FixedMetric,
    },
];

impl ForecastKind {
    pub fn descriptor(self) -> &'static ToolDescriptor {
        match self {
            ForecastKind::DailyWeather => &FORECAST_TOOLS[0],
            ForecastKind::HourlyWeather => &FORECAST_TOOLS[1],
            ForecastKind::DailyClimate => &FORECAST_TOOLS[2],
            ForecastKind::HourlyAirQuality => &FORECAST_TOOLS[3],
            ForecastKind::DailyAirQuality => &FORECAST_TOOLS[4],
        }
    }
}

impl ToolDescriptor {
    /// Query parameters sent upstream besides the coordinates
    pub fn query_params(&self, unit: Unit) -> Vec<(&'static str, String)> {
        let mut params = vec![("variables", self.variables.to_string())];
        if self.unit_mode == UnitMode::Caller {
            params.push(("unit", unit.as_str().to_string()));
        }
        params
    }

    /// Unit system used when looking up variable metadata
    pub fn metadata_unit(&self, requested: Unit) -> Unit {
        match self.unit_mode {
            UnitMode::Caller => requested,
            UnitMode::FixedMetric => Unit::Metric,
        }
    }
}
