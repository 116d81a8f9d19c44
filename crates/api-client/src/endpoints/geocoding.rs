//! Address search against a Nominatim-compatible service

use crate::client::SunpathClient;
use crate::error::{ApiError, ApiResult};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Short Korean-style address when available, else the full place name
    pub display_name: String,
    /// Address components keyed by Nominatim's field names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<BTreeMap<String, String>>,
}

/// Raw Nominatim place (`format=jsonv2`)
#[derive(Debug, Deserialize)]
struct Place {
    #[serde(default)]
    lat: Option<String>,
    #[serde(default)]
    lon: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: Option<BTreeMap<String, String>>,
    #[serde(default)]
    namedetails: Option<BTreeMap<String, String>>,
}

impl Place {
    /// `"{road}{ house}, {city} {state}"` when a road or name is known
    fn short_name(&self) -> Option<String> {
        let field = |map: &Option<BTreeMap<String, String>>, key: &str| {
            map.as_ref()
                .and_then(|m| m.get(key))
                .filter(|v| !v.is_empty())
                .cloned()
        };

        let road = field(&self.address, "road").or_else(|| field(&self.namedetails, "name"));
        match road {
            Some(road) => {
                let house = field(&self.address, "house_number")
                    .map(|h| format!(" {h}"))
                    .unwrap_or_default();
                let city = field(&self.address, "city")
                    .or_else(|| field(&self.address, "town"))
                    .or_else(|| field(&self.address, "county"))
                    .unwrap_or_default();
                let state = field(&self.address, "state").unwrap_or_default();
                Some(format!("{road}{house}, {city} {state}").trim().to_string())
            }
            None => self.display_name.clone(),
        }
    }

    fn into_result(self) -> Option<GeocodeResult> {
        let lat = self.lat.as_deref()?.parse().ok()?;
        let lon = self.lon.as_deref()?.parse().ok()?;
        let display_name = self.short_name().unwrap_or_default();
        Some(GeocodeResult {
            lat,
            lon,
            display_name,
            address: self.address,
        })
    }
}

/// Geocoding API interface
#[derive(Clone)]
pub struct GeocodingApi {
    client: SunpathClient,
}

impl GeocodingApi {
    pub(crate) fn new(client: SunpathClient) -> Self {
        Self { client }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{path}",
            self.client.config().geocoding.base_url.trim_end_matches('/')
        )
    }

    /// Search for an address. Queries under two characters return nothing
    /// without touching the network.
    pub async fn search(&self, query: &str) -> ApiResult<Vec<GeocodeResult>> {
        let query = query.trim();
        if query.chars().count() < 2 {
            return Ok(Vec::new());
        }

        let settings = &self.client.config().geocoding;
        let mut params = vec![
            ("q", query.to_string()),
            ("format", "jsonv2".to_string()),
            ("addressdetails", "1".to_string()),
            ("namedetails", "1".to_string()),
            ("accept-language", settings.accept_language.clone()),
            ("limit", settings.limit.to_string()),
        ];
        if !settings.country_codes.is_empty() {
            params.push(("countrycodes", settings.country_codes.clone()));
        }

        let places: Vec<Place> = self.fetch("search", &params).await?;
        let results: Vec<GeocodeResult> = places.into_iter().filter_map(Place::into_result).collect();
        debug!(query = %query, hits = results.len(), "Address search");
        Ok(results)
    }

    /// Address for a coordinate, if the service knows one
    pub async fn reverse(&self, lat: f64, lon: f64) -> ApiResult<Option<String>> {
        let settings = &self.client.config().geocoding;
        let params = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("format", "jsonv2".to_string()),
            ("addressdetails", "1".to_string()),
            ("namedetails", "1".to_string()),
            ("zoom", "18".to_string()),
            ("accept-language", settings.accept_language.clone()),
        ];

        match self.fetch::<Place>("reverse", &params).await {
            Ok(place) => Ok(place.short_name()),
            Err(ApiError::ApiResponse { status, .. }) => {
                debug!(status, "Reverse geocoding found nothing");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = self.url(path);
        let response = self
            .client
            .send(
                Method::GET,
                &url,
                Some(params),
                Option::<&()>::None,
                &sunpath_core::retry::RetryConfig::no_retry(),
            )
            .await?;
        self.client.read_json(response, |status, _| format!("Geocoding failed: {status}")).await
    }
}
