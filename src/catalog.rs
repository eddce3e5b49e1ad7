//! Variable metadata lookup and best-effort enrichment.

use crate::error::MetadataError;
use crate::models::{MetadataMap, Unit, VariableMetadata};

/// Source of per-variable metadata
pub trait MetadataSource: Send + Sync {
    fn lookup(&self, code: &str, unit: Unit) -> Result<VariableMetadata, MetadataError>;
}

/// Built-in catalog of the provider's published variable tables
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableCatalog;

impl MetadataSource for VariableCatalog {
    fn lookup(&self, code: &str, unit: Unit) -> Result<VariableMetadata, MetadataError> {
        let description = describe(code);
        let unit = unit_of(code, unit);
        if description.is_none() && unit.is_none() {
            return Err(MetadataError::UnknownVariable(code.to_string()));
        }

        Ok(VariableMetadata {
            description: description.map(str::to_string),
            unit: unit.map(str::to_string),
        })
    }
}

/// Looks up metadata for every code in a comma-separated list.
///
/// Each lookup is independent: a failing code is logged and left out, the
/// rest of the batch still goes through. Keys follow the list order.
pub fn load_metadata(source: &dyn MetadataSource, variables: &str, unit: Unit) -> MetadataMap {
    let mut metadata = MetadataMap::new();
    for code in variables.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        match source.lookup(code, unit) {
            Ok(md) => {
                metadata.entry(code).or_insert_with(|| md.into());
            }
            Err(e) => tracing::info!("no metadata for {}: {}", code, e),
        }
    }
    metadata
}

fn describe(code: &str) -> Option<&'static str> {
    let description = match code {
        "weatherCode" => "weather code used for weather icons",
        "timezone" => "time zone name",
        "sunrise" => "sunrise time",
        "sunset" => "sunset time",
        "tp" => "total precipitation",
        "minT" => "daily minimum temperature",
        "maxT" => "daily maximum temperature",
        "meanT" => "daily mean temperature",
        "meanUWind" => "daily mean eastward wind",
        "meanVWind" => "daily mean northward wind",
        "meanwindSpeed" => "daily mean wind speed",
        "meanwindDegree" => "daily mean wind direction (0-north, 180-south, clockwise)",
        "meanRH" => "daily mean relative humidity",
        "meanDP" => "daily mean dew point temperature",
        "snow" => "daily accumulated snow depth",
        "sunshine" => "daily accumulated sunshine duration",
        "solarR" => "daily accumulated downward shortwave radiation flux",
        "meanVis" => "daily mean visibility",
        "pressure" => "daily mean pressure",
        "meanST" => "daily mean top soil temperature",
        "maxST" => "daily maximum top soil temperature",
        "minST" => "daily minimum top soil temperature",
        "meanSoilw" => "daily mean top soil moisture",
        "crain" => "rain (1) or not (0)",
        "csnow" => "snow (1) or not (0)",
        "cicep" => "ice pellets (1) or not (0)",
        "cfrzr" => "freezing rain (1) or not (0)",
        "meanTcc" => "daily mean total cloud cover",
        "maxPrate" => "daily max precipitation rate",
        "maxCape" => "daily max surface convective available potential energy",
        "precipType" => {
            "precipitation type (0-no precip, 1-rain, 2-snow, 3-freezing rain, 4-ice pellets)"
        }
        "minApparentT" => "minimum apparent temperature (i.e. feels-like temperature)",
        "maxApparentT" => "maximum apparent temperature (i.e. feels-like temperature)",
        "t2m" => "2m air temperature",
        "tmin" => "daily minimum air temperature",
        "tmax" => "daily maximum air temperature",
        "u10" => "10m eastward wind",
        "v10" => "10m northward wind",
        "sh2" => "daily mean specific humidity",
        "st" => "top soil temperature",
        "soilw" => "top soil moisture",
        "prate" => "precipitation rate",
        "sdwe" => "daily total water equivalent snow depth",
        "dswrf" => "downward shortwave radiation flux",
        "CO" => "carbon monoxide concentration",
        "NO" => "nitric monoxide concentration",
        "NO2" => "nitrogen monoxide concentration",
        "SO2" => "sulfur monoxide concentration",
        "O3" => "ozone concentration",
        "PM25" => "particulate matter 2.5 concentration",
        "PM10" => "particulate matter 10 concentration",
        "AQI" => "air quality index",
        "DP" => "dominant pollutant according to AQI",
        "meanCO" => "daily mean carbon monoxide concentration",
        "meanNO" => "daily mean nitric monoxide concentration",
        "meanNO2" => "daily mean nitrogen monoxide concentration",
        "meanSO2" => "daily mean sulfur monoxide concentration",
        "meanO3" => "daily mean ozone concentration",
        "meanPM25" => "daily mean particulate matter 2.5 concentration",
        "meanPM10" => "daily mean particulate matter 10 concentration",
        "maxCO" => "daily maximum carbon monoxide concentration",
        "maxNO" => "daily maximum nitric monoxide concentration",
        "maxNO2" => "daily maximum nitrogen monoxide concentration",
        "maxSO2" => "daily maximum sulfur monoxide concentration",
        "maxO3" => "daily maximum ozone concentration",
        "maxPM25" => "daily maximum particulate matter 2.5 concentration",
        "maxPM10" => "daily maximum particulate matter 10 concentration",
        _ => return None,
    };
    Some(description)
}

fn unit_of(code: &str, unit: Unit) -> Option<&'static str> {
    // Codes whose unit does not depend on the unit system
    let shared = match code {
        "windDegree" | "meanwindDegree" => Some("degree"),
        "r2" | "tcc" | "meanRH" | "meanTcc" | "sh2" => Some("%"),
        "sunsd" | "sunshine" => Some("s"),
        "dswrf" | "solarR" => Some("w/m^2"),
        "sp" | "pressure" => Some("Pa"),
        "crain" | "csnow" | "cicep" | "cfrzr" => Some("0/1"),
        "prate" | "maxPrate" => Some("kg/m^2/s"),
        "cape" | "maxCape" => Some("J/kg"),
        "precipType" => Some("0/1/2/3/4"),
        "CO" | "NO" | "NO2" | "SO2" | "O3" | "PM25" | "PM10" | "meanCO" | "meanNO"
        | "meanNO2" | "meanSO2" | "meanO3" | "meanPM25" | "meanPM10" | "maxCO" | "maxNO"
        | "maxNO2" | "maxSO2" | "maxO3" | "maxPM25" | "maxPM10" => Some("\u{b5}g/m^3"),
        _ => None,
    };
    if shared.is_some() {
        return shared;
    }

    let temperature = matches!(
        code,
        "t2m" | "d2m" | "st" | "apparentT" | "minT" | "maxT" | "meanT" | "meanDP" | "meanST"
            | "maxST" | "minST" | "minApparentT" | "maxApparentT" | "tmin" | "tmax"
    );
    let speed = matches!(
        code,
        "u10" | "v10" | "windSpeed" | "meanUWind" | "meanVWind" | "meanwindSpeed"
    );
    let depth = matches!(code, "tp" | "sde" | "snow" | "sdwe");
    let distance = matches!(code, "vis" | "meanVis");

    match unit {
        Unit::Metric if temperature => Some("C"),
        Unit::Metric if speed => Some("km/h"),
        Unit::Metric if code == "tp" => Some("mm"),
        Unit::Metric if depth => Some("m"),
        Unit::Metric if distance => Some("km"),
        Unit::Imperial if temperature => Some("F"),
        Unit::Imperial if speed => Some("miles/h"),
        Unit::Imperial if depth => Some("inch"),
        Unit::Imperial if distance => Some("miles"),
        _ => None,
    }
}
