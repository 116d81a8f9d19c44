//! Request and response types of the calculation backend
//!
//! These mirror the JSON contract of `/api/integrated/*`. Optional numeric
//! fields stay `Option` so a missing value is never confused with zero.

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A plain latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl Coordinates {
    /// Create a coordinate pair
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Check latitude and longitude ranges
    pub fn validate(&self) -> Result<()> {
        check_range("lat", self.lat, -90.0, 90.0)?;
        check_range("lon", self.lon, -180.0, 180.0)
    }
}

/// Observer location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Altitude in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// IANA timezone, e.g. `Asia/Seoul`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl Location {
    /// Drop altitude and timezone
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Day and time window to sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateTimeRange {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// `HH:MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Sampling interval in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
}

/// Physical object casting the shadow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperties {
    /// Height in meters
    pub height: f64,
    /// Degrees from vertical
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt: Option<f64>,
    /// Degrees clockwise from north
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azimuth: Option<f64>,
}

/// Backend calculation precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// Fastest
    Low,
    /// Default
    Medium,
    /// Slowest, most accurate
    High,
}

/// Calculation switches
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationOptions {
    /// Apply atmospheric refraction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atmosphere: Option<bool>,
    /// Calculation precision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<Precision>,
    /// Fold in weather data when the backend has it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_weather: Option<bool>,
}

/// Body of `POST /api/integrated/calculate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarCalculationRequest {
    /// Where
    pub location: Location,
    /// When
    pub datetime: DateTimeRange,
    /// What casts the shadow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<ObjectProperties>,
    /// Calculation switches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<CalculationOptions>,
}

impl SolarCalculationRequest {
    /// The full-day request the simulator issues for a location and date:
    /// sea level, 00:00 to 23:59 hourly, refraction on, high precision.
    #[must_use]
    pub fn for_day(lat: f64, lon: f64, date: &str, object_height: f64) -> Self {
        Self {
            location: Location {
                lat,
                lon,
                altitude: Some(0.0),
                timezone: None,
            },
            datetime: DateTimeRange {
                date: date.to_string(),
                start_time: Some("00:00".to_string()),
                end_time: Some("23:59".to_string()),
                interval: Some(60),
            },
            object: Some(ObjectProperties {
                height: object_height,
                tilt: None,
                azimuth: None,
            }),
            options: Some(CalculationOptions {
                atmosphere: Some(true),
                precision: Some(Precision::High),
                include_weather: None,
            }),
        }
    }

    /// Apply the same bounds the backend enforces
    pub fn validate(&self) -> Result<()> {
        self.location.coordinates().validate()?;
        if let Some(alt) = self.location.altitude {
            if alt < 0.0 || !alt.is_finite() {
                return Err(Error::out_of_range("altitude", alt, 0.0, f64::INFINITY));
            }
        }

        parse_date(&self.datetime.date)?;
        for (field, time) in [
            ("start_time", &self.datetime.start_time),
            ("end_time", &self.datetime.end_time),
        ] {
            if let Some(t) = time {
                parse_hhmm(field, t)?;
            }
        }
        if let Some(interval) = self.datetime.interval {
            check_range("interval", f64::from(interval), 1.0, 1440.0)?;
        }

        if let Some(object) = &self.object {
            if !(object.height > 0.0 && object.height <= 1000.0) {
                return Err(Error::out_of_range("height", object.height, 0.0, 1000.0)
                    .with_context("height must be greater than zero"));
            }
            if let Some(tilt) = object.tilt {
                check_range("tilt", tilt, 0.0, 90.0)?;
            }
            if let Some(azimuth) = object.azimuth {
                if !(0.0..360.0).contains(&azimuth) {
                    return Err(Error::out_of_range("azimuth", azimuth, 0.0, 360.0));
                }
            }
        }

        Ok(())
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::out_of_range(field, value, min, max))
    }
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| Error::invalid_format("date", date, "YYYY-MM-DD"))
}

/// Parse a strict `HH:MM` time
pub fn parse_hhmm(field: &str, time: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| Error::invalid_format(field, time, "HH:MM"))
}

/// Solar position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunPosition {
    /// Above the horizon
    pub altitude: f64,
    /// Clockwise from north
    pub azimuth: f64,
    /// From the vertical
    pub zenith: f64,
    /// Degrees from solar noon
    #[serde(default)]
    pub hour_angle: Option<f64>,
}

/// Irradiance components in W/m²
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Irradiance {
    /// Global horizontal
    pub ghi: f64,
    /// Direct normal
    pub dni: f64,
    /// Diffuse horizontal
    pub dhi: f64,
    /// Photosynthetically active radiation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub par: Option<f64>,
}

/// Cast shadow of the object. Fields are absent when the sun is below the
/// horizon or the shadow is unbounded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Shadow {
    /// Meters
    #[serde(default)]
    pub length: Option<f64>,
    /// Degrees clockwise from north
    #[serde(default)]
    pub direction: Option<f64>,
    /// `[[lon, lat], [lon, lat]]` line from the object to the shadow tip
    #[serde(default)]
    pub coordinates: Option<Vec<[f64; 2]>>,
}

/// One sample of the calculated day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarDataPoint {
    /// RFC 3339 with offset
    pub timestamp: String,
    /// Sun position
    pub sun: SunPosition,
    /// Absent below the horizon
    #[serde(default)]
    pub irradiance: Option<Irradiance>,
    /// Absent when the backend computed no shadow
    #[serde(default)]
    pub shadow: Option<Shadow>,
}

/// Day summary computed by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarSummary {
    /// `HH:MM` local time
    pub sunrise: String,
    /// `HH:MM` local time
    pub sunset: String,
    /// `HH:MM` local time
    pub solar_noon: String,
    /// Hours
    pub day_length: f64,
    /// Degrees
    pub max_altitude: f64,
    /// kWh/m²
    #[serde(default)]
    pub total_irradiance: Option<f64>,
}

/// Stated accuracy of a calculation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accuracy {
    /// Degrees
    pub position: f64,
    /// Percent
    pub irradiance: f64,
}

/// Response metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Backend request id
    pub request_id: String,
    /// RFC 3339 time of the calculation
    pub timestamp: String,
    /// Backend version
    pub version: String,
    /// Stated accuracy
    pub accuracy: Accuracy,
}

/// Body returned by `POST /api/integrated/calculate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarCalculationResponse {
    /// Request metadata
    pub metadata: Metadata,
    /// Day summary
    pub summary: SolarSummary,
    /// Samples in time order
    pub series: Vec<SolarDataPoint>,
}

impl SolarCalculationResponse {
    /// `YYYY-MM-DD` of the first sample, if its timestamp has one
    #[must_use]
    pub fn first_date(&self) -> Option<&str> {
        self.series
            .first()
            .and_then(|p| p.timestamp.get(..10))
            .filter(|d| parse_date(d).is_ok())
    }
}

/// Body of `POST /api/integrated/batch`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCalculationRequest {
    /// Scenarios to calculate
    pub requests: Vec<SolarCalculationRequest>,
    /// Let the backend run requests concurrently
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

fn default_parallel() -> bool {
    true
}

/// One entry of a batch response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCalculationItem {
    /// Position of the request in the submitted batch
    pub index: usize,
    /// Whether this entry calculated
    pub success: bool,
    /// Present on success
    #[serde(default)]
    pub result: Option<SolarCalculationResponse>,
    /// Present on failure
    #[serde(default)]
    pub error: Option<String>,
}

/// Body returned by `POST /api/integrated/batch`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchCalculationResponse {
    /// Requests submitted
    pub total_requests: usize,
    /// Requests that calculated
    pub successful: usize,
    /// Requests that failed
    pub failed: usize,
    /// Backend time spent
    pub processing_time_ms: f64,
    /// One entry per request
    pub results: Vec<BatchCalculationItem>,
}

/// Instant with the highest irradiance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrradiancePeak {
    /// `HH:MM`
    pub time: String,
    /// W/m²
    pub ghi: f64,
    /// Degrees
    pub altitude: f64,
}

/// Instant with the highest sun
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AltitudePeak {
    /// `HH:MM`
    pub time: String,
    /// Degrees
    pub altitude: f64,
    /// W/m²
    pub ghi: f64,
}

/// Instant with the shortest shadow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowMinimum {
    /// `HH:MM`
    pub time: String,
    /// Meters
    pub shadow_length: f64,
    /// W/m²
    pub ghi: f64,
}

/// A contiguous window found by the optimizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    /// `HH:MM`
    pub start: String,
    /// `HH:MM`
    pub end: String,
    /// W/m² over the window
    pub average_ghi: f64,
    /// Window length
    pub duration_hours: f64,
}

/// Optimizer findings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optimization {
    /// Highest irradiance
    #[serde(default)]
    pub max_irradiance_period: Option<IrradiancePeak>,
    /// Highest sun
    #[serde(default)]
    pub max_altitude_period: Option<AltitudePeak>,
    /// Shortest shadow
    #[serde(default)]
    pub min_shadow_period: Option<ShadowMinimum>,
    /// Windows good for solar collection
    #[serde(default)]
    pub optimal_solar_collection_periods: Vec<Period>,
    /// Windows with long shadows
    #[serde(default)]
    pub shadow_interference_periods: Vec<Period>,
}

/// Body returned by `POST /api/integrated/optimize`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Backend status string
    pub status: String,
    /// Findings
    pub optimization: Optimization,
}

/// Body returned by `GET /api/solar/sunrise-sunset`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunriseSunset {
    /// `HH:MM` local time
    pub sunrise: String,
    /// `HH:MM` local time
    pub sunset: String,
    /// Any further fields the backend reports
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    const SAMPLE: &str = r#"{
        "metadata": {
            "request_id": "abc",
            "timestamp": "2025-06-21T03:00:00Z",
            "version": "0.1.0",
            "accuracy": {"position": 0.01, "irradiance": 5.0}
        },
        "summary": {
            "sunrise": "2025-06-21T05:11:00+09:00",
            "sunset": "2025-06-21T19:56:00+09:00",
            "solar_noon": "2025-06-21T12:33:00+09:00",
            "day_length": 14.75,
            "max_altitude": 76.1,
            "total_irradiance": null
        },
        "series": [
            {
                "timestamp": "2025-06-21T12:00:00+09:00",
                "sun": {"altitude": 75.0, "azimuth": 160.0, "zenith": 15.0, "hour_angle": -8.0},
                "irradiance": {"ghi": 900.0, "dni": 800.0, "dhi": 100.0},
                "shadow": {"length": 2.68, "direction": 340.0, "coordinates": null}
            },
            {
                "timestamp": "2025-06-21T21:00:00+09:00",
                "sun": {"altitude": -10.0, "azimuth": 310.0, "zenith": 100.0},
                "irradiance": null,
                "shadow": {"length": null, "direction": null}
            }
        ]
    }"#;

    #[test]
    fn test_response_deserialize() {
        let response: SolarCalculationResponse = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(response.series.len(), 2);
        assert_eq!(response.summary.total_irradiance, None);
        assert_eq!(response.series[1].sun.hour_angle, None);
        assert!(response.series[1].irradiance.is_none());
        assert_eq!(response.series[1].shadow.as_ref().unwrap().length, None);
        assert_eq!(response.first_date(), Some("2025-06-21"));
    }

    #[test]
    fn test_for_day_request_shape() {
        let request = SolarCalculationRequest::for_day(37.5665, 126.978, "2025-06-21", 10.0);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["datetime"]["start_time"], "00:00");
        assert_eq!(json["datetime"]["end_time"], "23:59");
        assert_eq!(json["datetime"]["interval"], 60);
        assert_eq!(json["options"]["precision"], "high");
        assert_eq!(json["location"]["altitude"], 0.0);
        assert!(json["location"].get("timezone").is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut request = SolarCalculationRequest::for_day(91.0, 0.0, "2025-06-21", 10.0);
        assert_eq!(request.validate().unwrap_err().code, ErrorCode::OutOfRange);

        request.location.lat = 10.0;
        request.object.as_mut().unwrap().height = 0.0;
        assert!(request.validate().is_err());

        request.object.as_mut().unwrap().height = 1000.0;
        assert!(request.validate().is_ok());

        request.datetime.interval = Some(0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_formats() {
        let request = SolarCalculationRequest::for_day(0.0, 0.0, "21/06/2025", 10.0);
        assert_eq!(request.validate().unwrap_err().code, ErrorCode::InvalidFormat);

        let mut request = SolarCalculationRequest::for_day(0.0, 0.0, "2025-06-21", 10.0);
        request.datetime.start_time = Some("7am".to_string());
        assert_eq!(request.validate().unwrap_err().code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_sunrise_sunset_keeps_extra_fields() {
        let json = r#"{"sunrise": "05:11", "sunset": "19:56", "day_length": 14.75}"#;
        let parsed: SunriseSunset = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.sunrise, "05:11");
        assert!(parsed.extra.contains_key("day_length"));
    }

    #[test]
    fn test_batch_request_default_parallel() {
        let parsed: BatchCalculationRequest = serde_json::from_str(r#"{"requests": []}"#).unwrap();
        assert!(parsed.parallel);
    }
}
