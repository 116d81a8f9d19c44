//! Shadow at a single instant

use crate::client::SunpathClient;
use crate::error::ApiResult;
use sunpath_core::model::{parse_date, parse_hhmm, Shadow};

/// Shadow API interface
#[derive(Clone)]
pub struct ShadowApi {
    client: SunpathClient,
}

impl ShadowApi {
    pub(crate) fn new(client: SunpathClient) -> Self {
        Self { client }
    }

    /// Shadow of an object of `object_height` meters at `date` `time` (`HH:MM`)
    pub async fn calculate(
        &self,
        lat: f64,
        lon: f64,
        date: &str,
        time: &str,
        object_height: f64,
    ) -> ApiResult<Shadow> {
        parse_date(date)?;
        parse_hhmm("time", time)?;
        let query = [
            ("lat", lat.to_string()),
            ("lon", lon.to_string()),
            ("date", date.to_string()),
            ("time", time.to_string()),
            ("object_height", object_height.to_string()),
        ];
        let response = self.client.get("api/shadow/calculate", &query).await?;
        self.client.read_json(response, |_, _| "Failed to calculate shadow".to_string()).await
    }
}
