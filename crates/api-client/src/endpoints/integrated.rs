//! Integrated calculation endpoints

use crate::client::SunpathClient;
use crate::error::{describe_failure, ApiResult, MessageOrder};
use sunpath_core::model::{
    BatchCalculationRequest, BatchCalculationResponse, OptimizationResult,
    SolarCalculationRequest, SolarCalculationResponse,
};
use tracing::info;

/// Integrated calculation API interface
#[derive(Clone)]
pub struct IntegratedApi {
    client: SunpathClient,
}

impl IntegratedApi {
    /// Create a new integrated API interface
    pub(crate) fn new(client: SunpathClient) -> Self {
        Self { client }
    }

    /// Positions, irradiance and shadows over the requested window.
    ///
    /// The request is checked against the backend's bounds before sending.
    pub async fn calculate(
        &self,
        request: &SolarCalculationRequest,
    ) -> ApiResult<SolarCalculationResponse> {
        request.validate()?;
        let locale = self.client.config().locale;

        let response = self.client.post("api/integrated/calculate", request).await?;
        let result: SolarCalculationResponse =
            self.client.read_json(response, |status, body| {
                describe_failure(status, body, MessageOrder::MessageFirst, None, locale)
            })
            .await?;

        info!(
            request_id = %result.metadata.request_id,
            points = result.series.len(),
            "Calculation complete"
        );
        Ok(result)
    }

    /// Optimal collection periods and shadow interference for a calculated day.
    ///
    /// The body is the full calculation response.
    pub async fn optimize(
        &self,
        data: &SolarCalculationResponse,
    ) -> ApiResult<OptimizationResult> {
        let locale = self.client.config().locale;
        let response = self.client.post("api/integrated/optimize", data).await?;
        self.client.read_json(response, |status, body| {
            describe_failure(
                status,
                body,
                MessageOrder::DetailFirst,
                Some("Optimization failed"),
                locale,
            )
        })
        .await
    }

    /// Several scenarios in one round trip.
    ///
    /// Each item in the response carries the `index` of its request; the
    /// backend may finish them out of order when `parallel` is set.
    pub async fn batch(
        &self,
        requests: Vec<SolarCalculationRequest>,
        parallel: bool,
    ) -> ApiResult<BatchCalculationResponse> {
        for request in &requests {
            request.validate()?;
        }
        let locale = self.client.config().locale;
        let body = BatchCalculationRequest { requests, parallel };

        let response = self.client.post("api/integrated/batch", &body).await?;
        let result: BatchCalculationResponse = self.client.read_json(response, |status, body| {
            describe_failure(
                status,
                body,
                MessageOrder::DetailFirst,
                Some("Batch calculation failed"),
                locale,
            )
        })
        .await?;

        info!(
            total = result.total_requests,
            successful = result.successful,
            failed = result.failed,
            "Batch complete"
        );
        Ok(result)
    }
}
