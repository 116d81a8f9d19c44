//! Sunrise and sunset

use crate::client::SunpathClient;
use crate::error::ApiResult;
use sunpath_core::model::{parse_date, SunriseSunset};

/// Sunrise/sunset API interface
#[derive(Clone)]
pub struct SolarApi {
    client: SunpathClient,
}

impl SolarApi {
    pub(crate) fn new(client: SunpathClient) -> Self {
        Self { client }
    }

    /// Sunrise and sunset for a location and date
    pub async fn sunrise_sunset(&self, lat: f64, lon: f64, date: &str) -> ApiResult<SunriseSunset> {
        parse_date(date)?;
        let query = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("date", date.to_string()),
        ];
        let response = self.client.get("api/solar/sunrise-sunset", &query).await?;
        self.client.read_json(response, |_, _| "Failed to fetch sunrise/sunset".to_string()).await
    }
}
